use std::{sync::Arc, time::Duration};

use serde::Serialize;
use thiserror::Error;
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{Instant, sleep_until},
};

use crate::{
    db::FeedbackGateway,
    errors::AppError,
    guestbook::stars::DEFAULT_MAX_STARS,
    models::{FeedbackEntry, NewFeedback},
};

#[derive(Error, Debug)]
pub enum FormError {
    #[error("Please fill out all fields and select a rating!")]
    MissingFields,

    #[error("Failed to submit the feedback, Try again!")]
    Backend(#[source] AppError),

    #[error("The form is not accepting input right now")]
    Busy,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum FormPhase {
    Editing,
    Submitting,
    Confirmed { entry: FeedbackEntry },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
    pub message: String,
    pub rating_label: String,
    pub comment: String,
}

/// Serializable view of the form for clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    pub name: String,
    pub comment: String,
    pub rating: u8,
    pub displayed_rating: u8,
    #[serde(flatten)]
    pub phase: FormPhase,
    pub confirmation: Option<Confirmation>,
}

/// Name, comment and a 1-5 star choice.
///
/// `Editing -> Submitting -> Confirmed -> Editing`. A failed submit goes back
/// to `Editing` with every field intact so the visitor can just retry. A
/// confirmed form clears itself once `confirm_delay` has passed.
#[derive(Debug)]
pub struct SubmissionForm {
    name: String,
    comment: String,
    rating: u8,
    hover: u8,
    phase: FormPhase,
    confirm_delay: Duration,
    confirmed_at: Option<Instant>,
}

impl SubmissionForm {
    pub fn new(confirm_delay: Duration) -> Self {
        Self {
            name: String::new(),
            comment: String::new(),
            rating: 0,
            hover: 0,
            phase: FormPhase::Editing,
            confirm_delay,
            confirmed_at: None,
        }
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub fn is_editing(&self) -> bool {
        self.phase == FormPhase::Editing
    }

    fn ensure_editing(&self) -> Result<(), FormError> {
        if self.is_editing() {
            Ok(())
        } else {
            Err(FormError::Busy)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), FormError> {
        self.ensure_editing()?;
        self.name = name.into();
        Ok(())
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) -> Result<(), FormError> {
        self.ensure_editing()?;
        self.comment = comment.into();
        Ok(())
    }

    /// Previews `star` without committing it.
    pub fn hover_star(&mut self, star: u8) -> Result<(), FormError> {
        self.ensure_editing()?;
        self.hover = star.min(DEFAULT_MAX_STARS as u8);
        Ok(())
    }

    pub fn leave_stars(&mut self) {
        self.hover = 0;
    }

    pub fn select_star(&mut self, star: u8) -> Result<(), FormError> {
        self.ensure_editing()?;
        self.rating = star.min(DEFAULT_MAX_STARS as u8);
        Ok(())
    }

    /// The hovered star wins over the committed one.
    pub fn displayed_rating(&self) -> u8 {
        if self.hover > 0 { self.hover } else { self.rating }
    }

    pub fn validate(&self) -> Result<NewFeedback, FormError> {
        let name = self.name.trim();
        let comment = self.comment.trim();
        if name.is_empty() || comment.is_empty() || self.rating == 0 {
            return Err(FormError::MissingFields);
        }

        Ok(NewFeedback {
            name: name.to_string(),
            comment: comment.to_string(),
            rating: self.rating as i16,
        })
    }

    /// Sends one create call. No retries.
    pub async fn submit(&mut self, gateway: &dyn FeedbackGateway) -> Result<FeedbackEntry, FormError> {
        self.ensure_editing()?;

        let record = self.validate().inspect_err(|_| {
            tracing::debug!("Rejected incomplete feedback submission");
        })?;

        self.phase = FormPhase::Submitting;

        match gateway.create(record).await {
            Ok(entry) => {
                tracing::info!("Feedback {} submitted by {}", entry.id, entry.name);
                self.phase = FormPhase::Confirmed {
                    entry: entry.clone(),
                };
                self.confirmed_at = Some(Instant::now());
                Ok(entry)
            }
            Err(e) => {
                tracing::error!("Error inserting feedback: {}", e);
                self.phase = FormPhase::Editing;
                Err(FormError::Backend(e))
            }
        }
    }

    pub fn confirmation(&self) -> Option<Confirmation> {
        match &self.phase {
            FormPhase::Confirmed { entry } => Some(Confirmation {
                message: format!("Thank you, {}!", entry.name),
                rating_label: format!("{} / {}", entry.rating, DEFAULT_MAX_STARS),
                comment: entry.comment.clone(),
            }),
            _ => None,
        }
    }

    pub fn reset_at(&self) -> Option<Instant> {
        match self.phase {
            FormPhase::Confirmed { .. } => self.confirmed_at.map(|at| at + self.confirm_delay),
            _ => None,
        }
    }

    /// Clears the form if its confirmation has been shown long enough.
    pub fn poll_reset(&mut self, now: Instant) -> bool {
        match self.reset_at() {
            Some(deadline) if now >= deadline => {
                self.reset();
                true
            }
            _ => false,
        }
    }

    pub fn reset(&mut self) {
        self.name.clear();
        self.comment.clear();
        self.rating = 0;
        self.hover = 0;
        self.phase = FormPhase::Editing;
        self.confirmed_at = None;
    }

    pub fn state(&self) -> FormState {
        FormState {
            name: self.name.clone(),
            comment: self.comment.clone(),
            rating: self.rating,
            displayed_rating: self.displayed_rating(),
            phase: self.phase.clone(),
            confirmation: self.confirmation(),
        }
    }
}

/// Submits a shared form and, on success, arms its automatic reset. The
/// returned handle resolves to whether the reset happened.
pub async fn submit_and_schedule_reset(
    form: &Arc<Mutex<SubmissionForm>>,
    gateway: &dyn FeedbackGateway,
) -> Result<(FeedbackEntry, JoinHandle<bool>), FormError> {
    let entry = form.lock().await.submit(gateway).await?;
    Ok((entry, schedule_reset(form.clone())))
}

pub fn schedule_reset(form: Arc<Mutex<SubmissionForm>>) -> JoinHandle<bool> {
    tokio::spawn(async move {
        let Some(deadline) = form.lock().await.reset_at() else {
            return false;
        };
        sleep_until(deadline).await;

        let reset = form.lock().await.poll_reset(Instant::now());
        if reset {
            tracing::debug!("Submission form cleared after confirmation");
        }
        reset
    })
}
