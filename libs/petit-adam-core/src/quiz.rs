//! Quiz state machine sequencing the verb and subject questions.
//!
//! ```text
//! LoadingInitial -> Loading -> AskingVerb <-> FeedbackIncorrectVerb
//!                                  |
//!                           FeedbackCorrect(verb)
//!                                  |
//!                             AskingSubject <-> FeedbackIncorrectSubject
//!                                  |
//!                           FeedbackCorrect(subject) -> Loading
//! ```
//!
//! Timed transitions are handed to the host as [`Timer`]s. Each new
//! transition replaces the pending timer, so firing an old token does nothing.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

use crate::bank::SentenceBank;
use crate::error::{BankError, QuizError, Result};
use crate::events::{QuizEvent, QuizObserver, SoundCue};
use crate::types::{GameStatus, QuizStats, Stage, TokenizedSentence, SUBJECT_REWARD};

/// Pacing of the automatic transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizTiming {
    /// Pause between preparing a sentence and asking for its verb.
    pub loading_delay: Duration,
    /// How long correct/incorrect feedback stays on screen.
    pub feedback_delay: Duration,
}

impl Default for QuizTiming {
    fn default() -> Self {
        Self {
            loading_delay: Duration::from_millis(300),
            feedback_delay: Duration::from_millis(1500),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    LoadingDone,
    FeedbackDone,
}

/// One-shot callback the host must fire after `delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    pub token: u64,
    pub kind: TimerKind,
    pub delay: Duration,
}

/// A single child's game: current sentence, selection, score and status.
pub struct QuizSession {
    timing: QuizTiming,
    status: GameStatus,
    bank: Option<SentenceBank>,
    last_index: Option<usize>,
    sentence: Option<TokenizedSentence>,
    selection: BTreeSet<usize>,
    stats: QuizStats,
    last_correct_stage: Option<Stage>,
    pending: Option<Timer>,
    next_token: u64,
    rng: StdRng,
    observers: Vec<Box<dyn QuizObserver>>,
}

impl QuizSession {
    pub fn new(timing: QuizTiming) -> Self {
        Self::with_rng(timing, StdRng::from_entropy())
    }

    /// Session with reproducible sentence order.
    pub fn with_seed(timing: QuizTiming, seed: u64) -> Self {
        Self::with_rng(timing, StdRng::seed_from_u64(seed))
    }

    fn with_rng(timing: QuizTiming, rng: StdRng) -> Self {
        Self {
            timing,
            status: GameStatus::LoadingInitial,
            bank: None,
            last_index: None,
            sentence: None,
            selection: BTreeSet::new(),
            stats: QuizStats::default(),
            last_correct_stage: None,
            pending: None,
            next_token: 0,
            rng,
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: Box<dyn QuizObserver>) {
        self.observers.push(observer);
    }

    // === Accessors ===

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn sentence(&self) -> Option<&TokenizedSentence> {
        self.sentence.as_ref()
    }

    pub fn selection(&self) -> Vec<usize> {
        self.selection.iter().copied().collect()
    }

    pub fn stats(&self) -> &QuizStats {
        &self.stats
    }

    pub fn score(&self) -> u32 {
        self.stats.score
    }

    pub fn last_correct_stage(&self) -> Option<Stage> {
        self.last_correct_stage
    }

    pub fn pending_timer(&self) -> Option<Timer> {
        self.pending
    }

    pub fn bank(&self) -> Option<&SentenceBank> {
        self.bank.as_ref()
    }

    /// Player-facing message when fallback sentences are in use.
    pub fn warning(&self) -> Option<&str> {
        self.bank.as_ref().and_then(SentenceBank::warning)
    }

    /// Whether the validate button is enabled.
    ///
    /// An empty selection only counts as an answer when the expected span is
    /// itself empty (implicit subject).
    pub fn can_submit(&self) -> bool {
        match (self.status.asking(), &self.sentence) {
            (Some(stage), Some(sentence)) => {
                !self.selection.is_empty() || sentence.span(stage).is_empty()
            }
            _ => false,
        }
    }

    /// Expected indices, shown only once the question is answered.
    pub fn revealed_span(&self) -> Option<(Stage, &[usize])> {
        let sentence = self.sentence.as_ref()?;
        let stage = match self.status {
            GameStatus::FeedbackCorrect => self.last_correct_stage?,
            _ => return None,
        };
        Some((stage, sentence.span(stage)))
    }

    /// Sound matching the feedback currently shown.
    pub fn current_cue(&self) -> Option<SoundCue> {
        match self.status {
            GameStatus::FeedbackCorrect => match self.last_correct_stage? {
                Stage::Verb => Some(SoundCue::GoodAnswer),
                Stage::Subject => Some(SoundCue::CashRegister),
            },
            GameStatus::FeedbackIncorrectVerb | GameStatus::FeedbackIncorrectSubject => {
                Some(SoundCue::Error)
            }
            _ => None,
        }
    }

    /// Question or feedback line shown above the sentence.
    pub fn prompt(&self) -> &'static str {
        match self.status {
            GameStatus::LoadingInitial => "Chargement des phrases...",
            GameStatus::Loading => "Je cherche une nouvelle phrase...",
            GameStatus::AskingVerb | GameStatus::FeedbackIncorrectVerb => "Quel est le verbe ?",
            GameStatus::AskingSubject | GameStatus::FeedbackIncorrectSubject => {
                "Quel est le sujet ?"
            }
            GameStatus::FeedbackCorrect => match self.last_correct_stage {
                Some(Stage::Verb) => "Bien joué pour le verbe !",
                Some(Stage::Subject) => "Bravo ! Phrase complète !",
                None => "Bravo ! C'est correct !",
            },
        }
    }

    // === Events ===

    /// Deliver the sentence bank, or the error that prevented loading it.
    pub fn load_bank(&mut self, loaded: std::result::Result<SentenceBank, BankError>) {
        let bank = SentenceBank::load_or_fallback(loaded);
        self.emit(QuizEvent::BankLoaded {
            source: bank.source(),
            sentences: bank.len(),
        });
        self.bank = Some(bank);
        self.last_index = None;

        if self.status == GameStatus::LoadingInitial {
            self.begin_loading(None);
        }
    }

    /// Show a host-supplied sentence next, abandoning the current one.
    pub fn present(&mut self, sentence: TokenizedSentence) -> Result<()> {
        if !sentence.spans_in_bounds() {
            return Err(QuizError::InvalidSentence {
                len: sentence.words.len(),
            });
        }
        self.begin_loading(Some(sentence));
        Ok(())
    }

    /// Toggle a word in the selection.
    pub fn tap(&mut self, index: usize) -> Result<()> {
        if self.status.asking().is_none() {
            return Err(QuizError::NotInteractive {
                status: self.status,
            });
        }
        let len = self.sentence.as_ref().map_or(0, |s| s.words.len());
        if index >= len {
            return Err(QuizError::IndexOutOfRange { index, len });
        }

        if !self.selection.remove(&index) {
            self.selection.insert(index);
        }
        Ok(())
    }

    /// Check the selection against the current stage. Returns whether it was correct.
    pub fn submit(&mut self) -> Result<bool> {
        let stage = self.status.asking().ok_or(QuizError::NotInteractive {
            status: self.status,
        })?;
        let sentence = self.sentence.as_ref().ok_or(QuizError::NotLoaded)?;
        let expected: BTreeSet<usize> = sentence.span(stage).iter().copied().collect();

        if self.selection.is_empty() && !expected.is_empty() {
            return Err(QuizError::EmptySelection);
        }

        let correct = self.selection == expected;
        self.selection.clear();
        self.stats.record(stage, correct);
        self.emit(QuizEvent::AnswerChecked { stage, correct });

        if correct {
            self.last_correct_stage = Some(stage);
            if stage == Stage::Subject {
                self.emit(QuizEvent::ScoreChanged {
                    score: self.stats.score,
                    gained: SUBJECT_REWARD,
                });
            }
            self.set_status(GameStatus::FeedbackCorrect);
        } else {
            self.set_status(match stage {
                Stage::Verb => GameStatus::FeedbackIncorrectVerb,
                Stage::Subject => GameStatus::FeedbackIncorrectSubject,
            });
        }
        self.schedule(TimerKind::FeedbackDone, self.timing.feedback_delay);
        Ok(correct)
    }

    /// Abandon the current sentence without penalty.
    pub fn skip(&mut self) -> Result<()> {
        if !self.status.can_skip() {
            return Err(QuizError::CannotSkip {
                status: self.status,
            });
        }
        if self.bank.is_none() {
            return Err(QuizError::NotLoaded);
        }
        self.emit(QuizEvent::Skipped {
            status: self.status,
        });
        self.begin_loading(None);
        Ok(())
    }

    /// Fire a timer previously returned by [`pending_timer`](Self::pending_timer).
    ///
    /// Returns false when the token is stale.
    pub fn fire(&mut self, token: u64) -> bool {
        match self.pending {
            Some(timer) if timer.token == token => {
                self.pending = None;
                self.on_timer(timer.kind);
                true
            }
            _ => false,
        }
    }

    fn on_timer(&mut self, kind: TimerKind) {
        match (kind, self.status) {
            (TimerKind::LoadingDone, GameStatus::Loading) if self.sentence.is_some() => {
                self.set_status(GameStatus::AskingVerb);
            }
            (TimerKind::FeedbackDone, GameStatus::FeedbackCorrect) => {
                match self.last_correct_stage {
                    Some(Stage::Subject) => self.begin_loading(None),
                    _ => self.set_status(GameStatus::AskingSubject),
                }
            }
            (TimerKind::FeedbackDone, GameStatus::FeedbackIncorrectVerb) => {
                self.set_status(GameStatus::AskingVerb);
            }
            (TimerKind::FeedbackDone, GameStatus::FeedbackIncorrectSubject) => {
                self.set_status(GameStatus::AskingSubject);
            }
            (kind, status) => {
                tracing::debug!(?kind, %status, "timer fired in unrelated state");
            }
        }
    }

    // === Internals ===

    fn begin_loading(&mut self, supplied: Option<TokenizedSentence>) {
        self.set_status(GameStatus::Loading);
        self.sentence = None;

        let next = match supplied {
            Some(sentence) => Some(sentence),
            None => self.bank.as_ref().map(|bank| {
                let index = bank.pick_index(&mut self.rng, self.last_index);
                self.last_index = Some(index);
                bank.prepare(index, &mut self.rng)
            }),
        };

        // Without a bank the host has to present a sentence.
        if let Some(sentence) = next {
            self.emit(QuizEvent::SentenceReady {
                phrase: sentence.phrase.clone(),
                words: sentence.words.len(),
            });
            self.sentence = Some(sentence);
            self.schedule(TimerKind::LoadingDone, self.timing.loading_delay);
        }
    }

    fn set_status(&mut self, to: GameStatus) {
        let from = self.status;
        self.status = to;
        self.selection.clear();
        self.pending = None;
        if from != to {
            self.emit(QuizEvent::StatusChanged { from, to });
        }
    }

    fn schedule(&mut self, kind: TimerKind, delay: Duration) {
        self.next_token += 1;
        self.pending = Some(Timer {
            token: self.next_token,
            kind,
            delay,
        });
    }

    fn emit(&mut self, event: QuizEvent) {
        for observer in &mut self.observers {
            observer.on_event(&event);
        }
    }
}
