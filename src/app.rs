use std::time::{Duration, Instant};

use crate::chat::ChatLauncher;
use crate::models::RecipeData;
use crate::progress::ProgressTracker;

/// How long the completed progress stays on screen after a request settles.
pub const SETTLE_HOLD: Duration = Duration::from_secs(1);

pub const INVALID_URL_MESSAGE: &str = "Please enter a valid URL, e.g. https://example.com/recipe";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Request in flight; the progress timer is running.
    Awaiting,
    /// Request settled; all tasks shown complete until `until`.
    Settling { until: Instant },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    UrlInput,
    Recipe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeTab {
    Ingredients,
    Instructions,
    Equipment,
    Tips,
    Nutrition,
}

impl RecipeTab {
    pub const ALL: [Self; 5] = [
        Self::Ingredients,
        Self::Instructions,
        Self::Equipment,
        Self::Tips,
        Self::Nutrition,
    ];

    pub const fn title(self) -> &'static str {
        match self {
            Self::Ingredients => "Ingredients",
            Self::Instructions => "Instructions",
            Self::Equipment => "Equipment",
            Self::Tips => "Tips",
            Self::Nutrition => "Nutrition",
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub const fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug)]
pub struct App {
    pub should_quit: bool,
    pub exit_pending: bool,
    pub show_help: bool,
    pub focus: Focus,
    pub url_input: String,
    pub phase: Phase,
    pub progress: ProgressTracker,
    pub recipe: Option<RecipeData>,
    pub error: Option<String>,
    pub selected_tab: RecipeTab,
    pub recipe_scroll: usize,
    pub chat: ChatLauncher,
}

impl App {
    pub fn new() -> Self {
        Self {
            should_quit: false,
            exit_pending: false,
            show_help: false,
            focus: Focus::UrlInput,
            url_input: String::new(),
            phase: Phase::Idle,
            progress: ProgressTracker::new(),
            recipe: None,
            error: None,
            selected_tab: RecipeTab::Ingredients,
            recipe_scroll: 0,
            chat: ChatLauncher::new(),
        }
    }

    pub const fn quit(&mut self) {
        self.should_quit = true;
    }

    pub const fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub const fn is_loading(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    /// The recipe is only shown once loading has fully finished.
    pub const fn is_recipe_visible(&self) -> bool {
        self.recipe.is_some() && !self.is_loading()
    }

    /// Start a recipe request for the URL field.
    /// Returns the URL to fetch, or `None` when no request should be made.
    pub fn submit_recipe(&mut self, now: Instant) -> Option<String> {
        if self.is_loading() {
            return None;
        }

        let recipe_url = self.url_input.trim();
        if recipe_url.is_empty() {
            return None;
        }
        if !is_web_url(recipe_url) {
            self.error = Some(INVALID_URL_MESSAGE.to_string());
            return None;
        }
        let recipe_url = recipe_url.to_string();

        self.phase = Phase::Awaiting;
        self.error = None;
        self.recipe = None;
        self.recipe_scroll = 0;
        self.selected_tab = RecipeTab::Ingredients;
        self.progress.start(now);

        Some(recipe_url)
    }

    /// Record the outcome of the request and hold the finished progress.
    pub fn finish_recipe(&mut self, result: Result<RecipeData, String>, now: Instant) {
        if self.phase != Phase::Awaiting {
            return;
        }

        match result {
            Ok(recipe) => self.recipe = Some(recipe),
            Err(message) => self.error = Some(message),
        }

        self.progress.complete_all();
        self.phase = Phase::Settling {
            until: now + SETTLE_HOLD,
        };
    }

    /// Advance timers: simulated progress, the settle hold and chat animations.
    pub fn on_tick(&mut self, now: Instant) {
        match self.phase {
            Phase::Awaiting if self.progress.is_running() => {
                self.progress.tick(now);
            }
            Phase::Settling { until } if now >= until => {
                self.phase = Phase::Idle;
                self.progress.reset();
                if self.recipe.is_some() {
                    self.focus = Focus::Recipe;
                }
            }
            Phase::Awaiting | Phase::Settling { .. } | Phase::Idle => {}
        }

        self.chat.tick(now);
    }

    /// URL sent along with chat messages.
    pub fn chat_recipe_url(&self) -> String {
        self.recipe
            .as_ref()
            .map_or_else(|| self.url_input.trim().to_string(), |r| r.url.clone())
    }

    pub fn toggle_chat(&mut self, now: Instant) {
        self.chat.toggle(now);
    }

    pub const fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::UrlInput if self.is_recipe_visible() => Focus::Recipe,
            Focus::UrlInput | Focus::Recipe => Focus::UrlInput,
        };
    }

    pub const fn next_tab(&mut self) {
        self.selected_tab = self.selected_tab.next();
        self.recipe_scroll = 0;
    }

    pub const fn previous_tab(&mut self) {
        self.selected_tab = self.selected_tab.previous();
        self.recipe_scroll = 0;
    }

    pub const fn scroll_up(&mut self, amount: usize) {
        self.recipe_scroll = self.recipe_scroll.saturating_sub(amount);
    }

    pub const fn scroll_down(&mut self, amount: usize) {
        self.recipe_scroll = self.recipe_scroll.saturating_add(amount);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

fn is_web_url(candidate: &str) -> bool {
    url::Url::parse(candidate)
        .is_ok_and(|parsed| matches!(parsed.scheme(), "http" | "https") && parsed.has_host())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::TASK_INTERVAL;

    fn pasta() -> RecipeData {
        serde_json::from_value(crate::models::fixtures::pasta_json()).unwrap()
    }

    fn submitted_app(now: Instant) -> App {
        let mut app = App::new();
        app.url_input = "https://example.com/pasta".to_string();
        assert!(app.submit_recipe(now).is_some());
        app
    }

    #[test]
    fn test_app_new() {
        let app = App::new();
        assert!(!app.should_quit);
        assert!(!app.is_loading());
        assert_eq!(app.focus, Focus::UrlInput);
        assert_eq!(app.progress.percent(), 0);
    }

    #[test]
    fn test_empty_url_issues_no_request() {
        let mut app = App::new();
        app.url_input = "   ".to_string();

        assert!(app.submit_recipe(Instant::now()).is_none());
        assert!(!app.is_loading());
        assert!(app.error.is_none());
    }

    #[test]
    fn test_invalid_url_shows_error() {
        let mut app = App::new();
        app.url_input = "pasta recipe".to_string();

        assert!(app.submit_recipe(Instant::now()).is_none());
        assert!(!app.is_loading());
        assert_eq!(app.error.as_deref(), Some(INVALID_URL_MESSAGE));
    }

    #[test]
    fn test_submit_enters_loading() {
        let now = Instant::now();
        let mut app = App::new();
        app.url_input = " https://example.com/pasta ".to_string();
        app.error = Some("old".to_string());
        app.recipe = Some(pasta());

        let url = app.submit_recipe(now);

        assert_eq!(url.as_deref(), Some("https://example.com/pasta"));
        assert_eq!(app.phase, Phase::Awaiting);
        assert!(app.error.is_none());
        assert!(app.recipe.is_none());
        assert!(app.progress.is_running());
    }

    #[test]
    fn test_no_second_submit_while_loading() {
        let now = Instant::now();
        let mut app = submitted_app(now);
        assert!(app.submit_recipe(now).is_none());
    }

    #[test]
    fn test_timer_advances_progress_while_awaiting() {
        let now = Instant::now();
        let mut app = submitted_app(now);

        app.on_tick(now + TASK_INTERVAL);
        assert_eq!(app.progress.percent(), 20);

        app.on_tick(now + TASK_INTERVAL * 2);
        assert_eq!(app.progress.percent(), 40);
    }

    #[test]
    fn test_fast_request_completes_all_tasks_and_holds() {
        let now = Instant::now();
        let mut app = submitted_app(now);
        let settled = now + Duration::from_millis(300);

        app.finish_recipe(Ok(pasta()), settled);

        assert_eq!(app.progress.percent(), 100);
        assert!(app.is_loading());
        assert!(!app.is_recipe_visible());

        app.on_tick(settled + Duration::from_millis(999));
        assert!(app.is_loading());

        app.on_tick(settled + SETTLE_HOLD);
        assert!(!app.is_loading());
        assert!(app.is_recipe_visible());
        assert_eq!(app.focus, Focus::Recipe);
        assert_eq!(app.progress.percent(), 0);
    }

    #[test]
    fn test_slow_request_still_completes_on_settle() {
        let now = Instant::now();
        let mut app = submitted_app(now);
        let settled = now + Duration::from_secs(40);

        app.on_tick(settled);
        app.finish_recipe(Ok(pasta()), settled);

        assert_eq!(app.progress.completed_count(), 5);
        assert!(!app.progress.is_running());
    }

    #[test]
    fn test_failed_request_shows_error() {
        let now = Instant::now();
        let mut app = submitted_app(now);

        app.finish_recipe(Err("Failed to process recipe".to_string()), now);
        app.on_tick(now + SETTLE_HOLD);

        assert_eq!(app.error.as_deref(), Some("Failed to process recipe"));
        assert!(app.recipe.is_none());
        assert_eq!(app.focus, Focus::UrlInput);
    }

    #[test]
    fn test_late_result_after_idle_is_ignored() {
        let now = Instant::now();
        let mut app = App::new();
        app.finish_recipe(Ok(pasta()), now);
        assert!(app.recipe.is_none());
        assert!(!app.is_loading());
    }

    #[test]
    fn test_chat_url_prefers_loaded_recipe() {
        let mut app = App::new();
        app.url_input = "https://example.com/typed".to_string();
        assert_eq!(app.chat_recipe_url(), "https://example.com/typed");

        app.recipe = Some(pasta());
        assert_eq!(app.chat_recipe_url(), "https://example.com/pasta");
    }

    #[test]
    fn test_tab_cycling() {
        let mut app = App::new();
        app.previous_tab();
        assert_eq!(app.selected_tab, RecipeTab::Nutrition);
        app.next_tab();
        app.next_tab();
        assert_eq!(app.selected_tab, RecipeTab::Instructions);
    }

    #[test]
    fn test_focus_only_moves_to_visible_recipe() {
        let mut app = App::new();
        app.toggle_focus();
        assert_eq!(app.focus, Focus::UrlInput);

        app.recipe = Some(pasta());
        app.toggle_focus();
        assert_eq!(app.focus, Focus::Recipe);
        app.toggle_focus();
        assert_eq!(app.focus, Focus::UrlInput);
    }

    #[test]
    fn test_scroll_up_saturates() {
        let mut app = App::new();
        app.recipe_scroll = 3;
        app.scroll_up(10);
        assert_eq!(app.recipe_scroll, 0);
    }
}
