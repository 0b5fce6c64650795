use std::sync::Arc;

use chrono::Utc;
use tokio::{
    sync::{Mutex, watch},
    task::JoinHandle,
};
use uuid::Uuid;

use crate::{
    guestbook::{
        AutoAdvance, Focus, SubmissionForm,
        form::{FormError, FormState, submit_and_schedule_reset},
    },
    models::messages::{FeedbackClientMessage, FeedbackServerMessage},
    state::AppState,
    ws::utils::send_to_viewer,
};

/// Per-socket state: the auto-advance driver (absent for the grid) and the
/// submission form.
pub struct ViewerSession {
    pub viewer_id: Uuid,
    state: AppState,
    rotation: Option<AutoAdvance>,
    form: Arc<Mutex<SubmissionForm>>,
    reset_task: Option<JoinHandle<()>>,
}

impl ViewerSession {
    pub fn new(viewer_id: Uuid, state: AppState) -> Self {
        let rotation = state
            .display
            .advance_period
            .map(|period| AutoAdvance::new(period, state.display.interaction_cooldown));
        let form = Arc::new(Mutex::new(SubmissionForm::new(state.display.confirm_delay)));

        Self {
            viewer_id,
            state,
            rotation,
            form,
            reset_task: None,
        }
    }

    pub fn start(&self) {
        if let Some(rotation) = &self.rotation {
            rotation.start();
        }
    }

    pub fn focus_updates(&self) -> Option<watch::Receiver<Focus>> {
        self.rotation.as_ref().map(AutoAdvance::subscribe)
    }

    pub fn focus(&self) -> Option<Focus> {
        self.rotation.as_ref().map(AutoAdvance::focus)
    }

    pub fn is_rotating(&self) -> bool {
        self.rotation.as_ref().is_some_and(AutoAdvance::is_running)
    }

    /// A confirmed submission is still waiting to push the cleared form.
    pub fn has_pending_reset(&self) -> bool {
        self.reset_task
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    pub async fn form_state(&self) -> FormState {
        self.form.lock().await.state()
    }

    pub fn set_entry_count(&self, len: usize) {
        if let Some(rotation) = &self.rotation {
            rotation.set_len(len);
        }
    }

    async fn send(&self, msg: &FeedbackServerMessage) {
        send_to_viewer(self.viewer_id, msg, &self.state.viewers).await;
    }

    pub async fn send_form_state(&self) {
        let state = self.form_state().await;
        self.send(&FeedbackServerMessage::Form { state }).await;
    }

    async fn alert(&self, message: String) {
        self.send(&FeedbackServerMessage::Alert { message }).await;
    }

    /// Manual navigation. The tree pauses and resumes by itself later, the
    /// carousel keeps going.
    fn navigated(&self, rotation: &AutoAdvance) {
        if !self.state.display.pauses_on_hover() {
            rotation.pause_for_interaction();
        }
    }

    pub async fn handle_message(&mut self, msg: FeedbackClientMessage) {
        match msg {
            FeedbackClientMessage::Ping { ts } => {
                let pong = Utc::now().timestamp_millis() as u64;
                self.send(&FeedbackServerMessage::Pong { ts, pong }).await;
            }
            FeedbackClientMessage::Hover { active } => {
                if let Some(rotation) = &self.rotation {
                    if self.state.display.pauses_on_hover() {
                        if active {
                            rotation.pause();
                        } else {
                            rotation.resume();
                        }
                    }
                }
            }
            FeedbackClientMessage::Next => {
                if let Some(rotation) = &self.rotation {
                    rotation.next();
                    self.navigated(rotation);
                }
            }
            FeedbackClientMessage::Prev => {
                if let Some(rotation) = &self.rotation {
                    rotation.previous();
                    self.navigated(rotation);
                }
            }
            FeedbackClientMessage::Select { index } => {
                if let Some(rotation) = &self.rotation {
                    if rotation.select(index).is_some() {
                        self.navigated(rotation);
                    }
                }
            }
            FeedbackClientMessage::FormName { value } => {
                let result = self.form.lock().await.set_name(value);
                self.after_form_input(result).await;
            }
            FeedbackClientMessage::FormComment { value } => {
                let result = self.form.lock().await.set_comment(value);
                self.after_form_input(result).await;
            }
            FeedbackClientMessage::FormHover { star } => {
                let result = self.form.lock().await.hover_star(star);
                self.after_form_input(result).await;
            }
            FeedbackClientMessage::FormLeave => {
                self.form.lock().await.leave_stars();
                self.send_form_state().await;
            }
            FeedbackClientMessage::FormStar { star } => {
                let result = self.form.lock().await.select_star(star);
                self.after_form_input(result).await;
            }
            FeedbackClientMessage::FormSubmit => self.submit().await,
        }
    }

    async fn after_form_input(&self, result: Result<(), FormError>) {
        if let Err(e) = result {
            tracing::debug!("Viewer {} form input ignored: {}", self.viewer_id, e);
        }
        self.send_form_state().await;
    }

    async fn submit(&mut self) {
        match submit_and_schedule_reset(&self.form, self.state.gateway.as_ref()).await {
            Ok((entry, reset)) => {
                tracing::info!("Viewer {} submitted feedback {}", self.viewer_id, entry.id);

                let viewer_id = self.viewer_id;
                let viewers = self.state.viewers.clone();
                let form = self.form.clone();
                let notify_reset = tokio::spawn(async move {
                    if let Ok(true) = reset.await {
                        let state = form.lock().await.state();
                        send_to_viewer(viewer_id, &FeedbackServerMessage::Form { state }, &viewers)
                            .await;
                    }
                });
                if let Some(previous) = self.reset_task.replace(notify_reset) {
                    previous.abort();
                }
            }
            Err(e) => self.alert(e.to_string()).await,
        }

        self.send_form_state().await;
    }

    pub fn close(&mut self) {
        if let Some(rotation) = &self.rotation {
            rotation.stop();
        }
        if let Some(task) = self.reset_task.take() {
            task.abort();
        }
    }
}

impl Drop for ViewerSession {
    fn drop(&mut self) {
        self.close();
    }
}
