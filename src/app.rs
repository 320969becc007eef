use std::collections::HashSet;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;
use tokio::sync::mpsc;

use crate::chain::{Address, ContractGateway, GatewayError, WalletError, WalletProvider};
use crate::config::Config;
use crate::feed::{sanitize_content, sort_posts, Tweet};

/// Everything the UI loop reacts to: key input from the terminal thread
/// and completion reports from spawned remote calls. Spawned tasks never
/// touch `App` directly, they post one of these.
#[derive(Debug)]
pub enum AppEvent {
    Input(KeyEvent),
    Connected(Address),
    ConnectFailed(WalletError),
    FeedLoaded(Vec<Tweet>),
    FeedFailed(GatewayError),
    PostSubmitted,
    SubmitFailed(GatewayError),
    Liked { id: u64 },
    LikeFailed { id: u64, error: GatewayError },
}

/// The connected account, if any. Set on successful connect, cleared only
/// by process exit; there is no disconnect flow.
#[derive(Debug, Default)]
pub struct Session {
    pub account: Option<Address>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Compose,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

pub struct App {
    pub config: Config,
    pub session: Session,
    pub mode: Mode,
    pub compose_text: String,
    pub tweets: Vec<Tweet>,
    pub list_state: ListState,
    pub notice: Option<Notice>,
    pub should_quit: bool,

    // Per-affordance busy state. Each action is Idle -> Pending -> Idle;
    // likes are tracked per post so two different posts can be in flight
    // at once while a second trigger on the same one is ignored.
    pub connecting: bool,
    pub submitting: bool,
    pub refreshing: bool,
    pub pending_likes: HashSet<u64>,
    // A missing provider is terminal for the session: no retry loop.
    pub provider_missing: bool,

    provider: Arc<dyn WalletProvider>,
    gateway: Arc<dyn ContractGateway>,
    tx: mpsc::Sender<AppEvent>,
}

impl App {
    pub fn new(
        config: Config,
        provider: Arc<dyn WalletProvider>,
        gateway: Arc<dyn ContractGateway>,
        tx: mpsc::Sender<AppEvent>,
    ) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));

        Self {
            config,
            session: Session::default(),
            mode: Mode::Browse,
            compose_text: String::new(),
            tweets: Vec::new(),
            list_state,
            notice: None,
            should_quit: false,
            connecting: false,
            submitting: false,
            refreshing: false,
            pending_likes: HashSet::new(),
            provider_missing: false,
            provider,
            gateway,
            tx,
        }
    }

    pub fn selected_tweet(&self) -> Option<&Tweet> {
        self.tweets.get(self.list_state.selected()?)
    }

    pub fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(key) => self.handle_key(key),
            AppEvent::Connected(account) => {
                self.connecting = false;
                self.notice = Some(Notice::Info(format!("connected as {}", account.shorten())));
                self.session.account = Some(account);
                // Initial load, exactly once per connect.
                self.start_refresh();
            }
            AppEvent::ConnectFailed(error) => {
                self.connecting = false;
                if matches!(error, WalletError::NoProvider { .. }) {
                    self.provider_missing = true;
                    self.notice = Some(Notice::Error(format!(
                        "{error} - start a wallet provider and relaunch"
                    )));
                } else {
                    self.notice = Some(Notice::Error(error.to_string()));
                }
                tracing::warn!(%error, "connect failed");
            }
            AppEvent::FeedLoaded(posts) => {
                self.refreshing = false;
                self.replace_feed(posts);
            }
            AppEvent::FeedFailed(error) => {
                // Keep the prior list on screen; `r` retries.
                self.refreshing = false;
                self.notice = Some(Notice::Error(format!("{error} - press r to retry")));
                tracing::warn!(%error, "feed fetch failed");
            }
            AppEvent::PostSubmitted => {
                self.submitting = false;
                self.compose_text.clear();
                self.mode = Mode::Browse;
                self.notice = Some(Notice::Info("posted".to_string()));
                self.start_refresh();
            }
            AppEvent::SubmitFailed(error) => {
                // Compose stays open with the draft intact.
                self.submitting = false;
                self.notice = Some(Notice::Error(error.to_string()));
                tracing::warn!(%error, "post submit failed");
            }
            AppEvent::Liked { id } => {
                self.pending_likes.remove(&id);
                self.start_refresh();
            }
            AppEvent::LikeFailed { id, error } => {
                self.pending_likes.remove(&id);
                self.notice = Some(Notice::Error(error.to_string()));
                tracing::warn!(%error, id, "like failed");
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.mode {
            Mode::Browse => self.handle_browse_key(key),
            Mode::Compose => self.handle_compose_key(key),
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('c') => self.start_connect(),
            KeyCode::Char('r') => self.start_refresh(),
            KeyCode::Char('n') => {
                if self.session.account.is_some() {
                    self.mode = Mode::Compose;
                    self.compose_text.clear();
                } else {
                    self.notice = Some(Notice::Error(
                        "connect a wallet before posting (press c)".to_string(),
                    ));
                }
            }
            KeyCode::Char('l') | KeyCode::Enter => self.start_like(),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_up(),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_down(),
            _ => {}
        }
    }

    fn handle_compose_key(&mut self, key: KeyEvent) {
        // The modal is locked while the submission is in flight.
        if self.submitting {
            return;
        }

        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Browse;
                self.compose_text.clear();
            }
            KeyCode::Enter => self.start_submit(),
            KeyCode::Backspace => {
                self.compose_text.pop();
            }
            KeyCode::Char(c) => {
                if self.compose_text.chars().count() < self.config.max_post_length {
                    self.compose_text.push(c);
                }
            }
            _ => {}
        }
    }

    fn scroll_up(&mut self) {
        if let Some(selected) = self.list_state.selected() {
            if selected > 0 {
                self.list_state.select(Some(selected - 1));
            }
        }
    }

    fn scroll_down(&mut self) {
        if let Some(selected) = self.list_state.selected() {
            if selected < self.tweets.len().saturating_sub(1) {
                self.list_state.select(Some(selected + 1));
            }
        }
    }

    /// Full replace, never an incremental merge: the view is always a
    /// total re-derivation of the latest successful fetch.
    fn replace_feed(&mut self, mut posts: Vec<Tweet>) {
        for post in &mut posts {
            post.content = sanitize_content(&post.content);
        }
        sort_posts(&mut posts);
        self.tweets = posts;

        let last = self.tweets.len().saturating_sub(1);
        match self.list_state.selected() {
            Some(selected) if selected > last => self.list_state.select(Some(last)),
            None => self.list_state.select(Some(0)),
            _ => {}
        }
    }

    fn start_connect(&mut self) {
        if self.connecting || self.provider_missing {
            return;
        }
        self.connecting = true;
        self.notice = Some(Notice::Info("connecting...".to_string()));

        let provider = self.provider.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let event = match provider.request_accounts().await {
                // The first authorized account becomes the session.
                Ok(accounts) => match accounts.into_iter().next() {
                    Some(account) => AppEvent::Connected(account),
                    None => AppEvent::ConnectFailed(WalletError::NoAccounts),
                },
                Err(error) => AppEvent::ConnectFailed(error),
            };
            let _ = tx.send(event).await;
        });
    }

    fn start_refresh(&mut self) {
        let Some(viewer) = self.session.account.clone() else {
            return;
        };
        if self.refreshing {
            return;
        }
        self.refreshing = true;

        let gateway = self.gateway.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let event = match gateway.fetch_all_posts(&viewer).await {
                Ok(posts) => AppEvent::FeedLoaded(posts),
                Err(error) => AppEvent::FeedFailed(error),
            };
            let _ = tx.send(event).await;
        });
    }

    fn start_submit(&mut self) {
        let Some(from) = self.session.account.clone() else {
            return;
        };
        let content = self.compose_text.trim().to_string();
        if self.submitting || content.is_empty() {
            return;
        }
        self.submitting = true;

        let gateway = self.gateway.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let event = match gateway.submit_post(&content, &from).await {
                Ok(()) => AppEvent::PostSubmitted,
                Err(error) => AppEvent::SubmitFailed(error),
            };
            let _ = tx.send(event).await;
        });
    }

    fn start_like(&mut self) {
        let Some(from) = self.session.account.clone() else {
            return;
        };
        let Some(tweet) = self.selected_tweet() else {
            return;
        };
        let (author, id) = (tweet.author.clone(), tweet.id);
        if !self.pending_likes.insert(id) {
            return;
        }

        let gateway = self.gateway.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let event = match gateway.like_post(&author, id, &from).await {
                Ok(()) => AppEvent::Liked { id },
                Err(error) => AppEvent::LikeFailed { id, error },
            };
            let _ = tx.send(event).await;
        });
    }
}
