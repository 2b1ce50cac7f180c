// Recipe assistant conversation state and the launcher that shows it

use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::models::Message;

pub const GREETING: &str = "Hi there! How can I help you today?";
pub const FALLBACK_REPLY: &str = "Sorry, I encountered an error. Please try again.";

/// Length of the launcher's enter and exit animations.
pub const ANIMATION_DURATION: Duration = Duration::from_millis(220);

/// One mounted conversation. Dropping it discards the history.
#[derive(Debug)]
pub struct ChatDialog {
    session: Uuid,
    messages: Vec<Message>,
    pub input: String,
    is_loading: bool,
    pub scroll_offset: usize,
}

impl ChatDialog {
    pub fn new() -> Self {
        Self {
            session: Uuid::new_v4(),
            messages: vec![Message::assistant(GREETING.to_string())],
            input: String::new(),
            is_loading: false,
            scroll_offset: 0,
        }
    }

    pub const fn session(&self) -> Uuid {
        self.session
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn can_submit(&self) -> bool {
        !self.is_loading && !self.input.trim().is_empty()
    }

    /// Move the input into the conversation as a user message.
    /// Returns the text to send, or `None` when nothing should be sent.
    pub fn submit(&mut self) -> Option<String> {
        if !self.can_submit() {
            return None;
        }

        let text = std::mem::take(&mut self.input);
        self.messages.push(Message::user(text.clone()));
        self.is_loading = true;
        self.scroll_to_bottom();

        Some(text)
    }

    /// Append the assistant's answer, or the fallback text on failure.
    pub fn receive_reply(&mut self, reply: Result<String, String>) {
        let content = reply.unwrap_or_else(|_| FALLBACK_REPLY.to_string());
        self.messages.push(Message::assistant(content));
        self.is_loading = false;
        self.scroll_to_bottom();
    }

    pub const fn scroll_up(&mut self, amount: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    pub const fn scroll_down(&mut self, amount: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(amount);
    }

    pub const fn scroll_to_bottom(&mut self) {
        // Clamped by the renderer
        self.scroll_offset = usize::MAX;
    }
}

impl Default for ChatDialog {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Entering(Instant),
    Exiting(Instant),
}

/// Toggles the chat dialog. The dialog stays mounted until its exit
/// animation finishes.
#[derive(Debug, Default)]
pub struct ChatLauncher {
    open: bool,
    dialog: Option<ChatDialog>,
    transition: Option<Transition>,
}

impl ChatLauncher {
    pub const fn new() -> Self {
        Self {
            open: false,
            dialog: None,
            transition: None,
        }
    }

    pub const fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self, now: Instant) {
        if self.open {
            self.open = false;
            self.transition = Some(Transition::Exiting(now));
        } else {
            self.open = true;
            if self.dialog.is_none() {
                self.dialog = Some(ChatDialog::new());
            }
            self.transition = Some(Transition::Entering(now));
        }
    }

    pub fn close(&mut self, now: Instant) {
        if self.open {
            self.toggle(now);
        }
    }

    /// Finish animations that have run their course, unmounting on exit.
    pub fn tick(&mut self, now: Instant) {
        match self.transition {
            Some(Transition::Entering(start)) if now.duration_since(start) >= ANIMATION_DURATION => {
                self.transition = None;
            }
            Some(Transition::Exiting(start)) if now.duration_since(start) >= ANIMATION_DURATION => {
                self.transition = None;
                self.dialog = None;
            }
            _ => {}
        }
    }

    /// How much of the dialog is shown, from 0.0 (hidden) to 1.0.
    pub fn visibility(&self, now: Instant) -> f32 {
        match self.transition {
            Some(Transition::Entering(start)) => ease_out(animation_progress(start, now)),
            Some(Transition::Exiting(start)) => 1.0 - ease_out(animation_progress(start, now)),
            None if self.dialog.is_some() => 1.0,
            None => 0.0,
        }
    }

    pub const fn dialog(&self) -> Option<&ChatDialog> {
        self.dialog.as_ref()
    }

    pub fn dialog_mut(&mut self) -> Option<&mut ChatDialog> {
        self.dialog.as_mut()
    }

    /// The dialog, but only while it accepts input.
    pub fn active_dialog_mut(&mut self) -> Option<&mut ChatDialog> {
        if self.open {
            self.dialog.as_mut()
        } else {
            None
        }
    }

    /// The mounted dialog for `session`, if it is still around.
    pub fn dialog_for_session(&mut self, session: Uuid) -> Option<&mut ChatDialog> {
        self.dialog.as_mut().filter(|d| d.session() == session)
    }
}

fn animation_progress(start: Instant, now: Instant) -> f32 {
    let elapsed = now.saturating_duration_since(start).as_secs_f32();
    (elapsed / ANIMATION_DURATION.as_secs_f32()).clamp(0.0, 1.0)
}

fn ease_out(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MessageRole;

    fn count_by_role(dialog: &ChatDialog, role: MessageRole) -> usize {
        dialog.messages().iter().filter(|m| m.role == role).count()
    }

    #[test]
    fn test_dialog_seeded_with_greeting() {
        let dialog = ChatDialog::new();
        assert_eq!(dialog.messages().len(), 1);
        assert_eq!(dialog.messages()[0].role, MessageRole::Assistant);
        assert_eq!(dialog.messages()[0].content, GREETING);
    }

    #[test]
    fn test_submit_appends_one_user_message() {
        let mut dialog = ChatDialog::new();
        dialog.input = "Can I freeze this?".to_string();

        let sent = dialog.submit();

        assert_eq!(sent.as_deref(), Some("Can I freeze this?"));
        assert_eq!(dialog.messages().len(), 2);
        assert_eq!(count_by_role(&dialog, MessageRole::User), 1);
        assert!(dialog.input.is_empty());
        assert!(dialog.is_loading());
    }

    #[test]
    fn test_reply_appends_one_assistant_message() {
        let mut dialog = ChatDialog::new();
        dialog.input = "Can I freeze this?".to_string();
        dialog.submit();

        dialog.receive_reply(Ok("Yes, for up to a month.".to_string()));

        assert_eq!(dialog.messages().len(), 3);
        assert_eq!(count_by_role(&dialog, MessageRole::Assistant), 2);
        assert_eq!(dialog.messages()[2].content, "Yes, for up to a month.");
        assert!(!dialog.is_loading());
    }

    #[test]
    fn test_failed_reply_uses_fallback_text() {
        let mut dialog = ChatDialog::new();
        dialog.input = "hello".to_string();
        dialog.submit();

        dialog.receive_reply(Err("connection refused".to_string()));

        assert_eq!(dialog.messages().len(), 3);
        assert_eq!(dialog.messages()[2].content, FALLBACK_REPLY);
    }

    #[test]
    fn test_blank_input_is_not_sent() {
        let mut dialog = ChatDialog::new();
        dialog.input = "   ".to_string();

        assert!(dialog.submit().is_none());
        assert_eq!(dialog.messages().len(), 1);
        assert_eq!(dialog.input, "   ");
    }

    #[test]
    fn test_no_submit_while_loading() {
        let mut dialog = ChatDialog::new();
        dialog.input = "first".to_string();
        dialog.submit();
        dialog.input = "second".to_string();

        assert!(dialog.submit().is_none());
        assert_eq!(count_by_role(&dialog, MessageRole::User), 1);
    }

    #[test]
    fn test_launcher_toggle_mounts_dialog() {
        let now = Instant::now();
        let mut launcher = ChatLauncher::new();
        assert!(launcher.dialog().is_none());

        launcher.toggle(now);

        assert!(launcher.is_open());
        assert!(launcher.dialog().is_some());
        assert!(launcher.active_dialog_mut().is_some());
    }

    #[test]
    fn test_launcher_unmounts_after_exit_animation() {
        let now = Instant::now();
        let mut launcher = ChatLauncher::new();
        launcher.toggle(now);
        launcher.toggle(now + Duration::from_secs(1));

        assert!(!launcher.is_open());
        assert!(launcher.dialog().is_some());
        assert!(launcher.active_dialog_mut().is_none());

        launcher.tick(now + Duration::from_secs(1) + ANIMATION_DURATION);
        assert!(launcher.dialog().is_none());
    }

    #[test]
    fn test_reopen_mid_exit_keeps_conversation() {
        let now = Instant::now();
        let mut launcher = ChatLauncher::new();
        launcher.toggle(now);
        let session = launcher.dialog().unwrap().session();

        launcher.toggle(now + Duration::from_secs(1));
        launcher.toggle(now + Duration::from_secs(1) + Duration::from_millis(50));

        assert_eq!(launcher.dialog().unwrap().session(), session);
    }

    #[test]
    fn test_reopen_after_exit_starts_new_conversation() {
        let now = Instant::now();
        let mut launcher = ChatLauncher::new();
        launcher.toggle(now);
        let session = launcher.dialog().unwrap().session();

        launcher.close(now);
        launcher.tick(now + ANIMATION_DURATION);
        launcher.toggle(now + Duration::from_secs(2));

        assert_ne!(launcher.dialog().unwrap().session(), session);
        assert!(launcher.dialog_for_session(session).is_none());
    }

    #[test]
    fn test_visibility_animates() {
        let now = Instant::now();
        let mut launcher = ChatLauncher::new();
        assert!(launcher.visibility(now).abs() < f32::EPSILON);

        launcher.toggle(now);
        let halfway = launcher.visibility(now + ANIMATION_DURATION / 2);
        assert!(halfway > 0.0 && halfway < 1.0);

        launcher.tick(now + ANIMATION_DURATION);
        assert!((launcher.visibility(now + ANIMATION_DURATION) - 1.0).abs() < f32::EPSILON);
    }
}
