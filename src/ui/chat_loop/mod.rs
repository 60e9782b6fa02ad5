//! Interactive chat screen.
//!
//! Terminal events, session actions coming back from background tasks and
//! a frame tick are multiplexed with `tokio::select!`. All state changes go
//! through [`SessionRuntime::dispatch`]; the screen only owns the input
//! buffer and the scroll position.

pub mod keybindings;
pub mod lifecycle;

use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use ratatui::crossterm::event::{self, Event};
use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::api::{ChatApi, HttpChatApi};
use crate::core::session::{ActionDispatcher, Session, SessionAction, SessionRuntime};
use crate::core::store::{FileStore, Store};
use crate::ui::renderer::{self, RenderContext};
use crate::ui::theme::Theme;
use crate::utils::input::InputBuffer;

use keybindings::{map_key, EditOp, KeyOutcome};
use lifecycle::{restore_terminal, setup_terminal};

const FRAME_INTERVAL: Duration = Duration::from_millis(100);
const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(50);

pub enum UiEvent {
    Crossterm(Event),
}

/// Everything needed to open the interactive screen.
#[derive(Debug, Clone)]
pub struct ChatOptions {
    pub base_url: String,
    pub request_timeout: Duration,
    pub data_dir: PathBuf,
    pub theme: Theme,
}

/// Screen-local state: the composer and the transcript scroll position.
#[derive(Debug, Default)]
pub struct ChatView {
    pub input: InputBuffer,
    pub scroll_from_bottom: u16,
}

impl ChatView {
    fn scroll_up(&mut self, rows: u16, max_scroll: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(rows).min(max_scroll);
    }

    fn scroll_down(&mut self, rows: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(rows);
    }

    fn edit(&mut self, op: EditOp) -> bool {
        let before = self.input.char_len();
        match op {
            EditOp::Insert(c) => self.input.insert_char(c),
            EditOp::Backspace => {
                self.input.backspace();
            }
            EditOp::Delete => {
                self.input.delete();
            }
            EditOp::Left => self.input.move_left(),
            EditOp::Right => self.input.move_right(),
            EditOp::Home => self.input.move_home(),
            EditOp::End => self.input.move_end(),
        }
        before != self.input.char_len()
    }
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        while !event_tx.is_closed() {
            match event::poll(EVENT_POLL_INTERVAL) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => continue,
                },
                Ok(false) => {}
                Err(_) => break,
            }
        }
    })
}

/// Whether the loop should keep running after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

fn max_scroll_for(session: &Session, theme: &Theme, area: Rect) -> u16 {
    let lines = renderer::build_display_lines(session, theme, None);
    renderer::max_scroll(
        renderer::wrapped_line_count(&lines, area.width),
        renderer::transcript_rows(area),
    )
}

/// Apply one key outcome to the view and the session.
pub async fn apply_key_outcome<S, A>(
    outcome: KeyOutcome,
    view: &mut ChatView,
    runtime: &mut SessionRuntime<S, A>,
    area: Rect,
    theme: &Theme,
) -> LoopControl
where
    S: Store,
    A: ChatApi + 'static,
{
    let visible_rows = renderer::transcript_rows(area);

    match outcome {
        KeyOutcome::Quit => return LoopControl::Exit,
        KeyOutcome::Submit => {
            // A busy session drops the submission, so keep the draft.
            let text = if runtime.session().is_processing() {
                view.input.text().to_string()
            } else {
                view.input.take()
            };
            view.scroll_from_bottom = 0;
            runtime.dispatch(SessionAction::Submit { text }).await;
            runtime
                .dispatch(SessionAction::InputChanged {
                    length: view.input.char_len(),
                })
                .await;
        }
        KeyOutcome::ToggleMode => runtime.dispatch(SessionAction::ToggleMode).await,
        KeyOutcome::RequestClear => runtime.dispatch(SessionAction::RequestClear).await,
        KeyOutcome::ConfirmClear => {
            view.scroll_from_bottom = 0;
            runtime.dispatch(SessionAction::ConfirmClear).await;
        }
        KeyOutcome::CancelClear => runtime.dispatch(SessionAction::CancelClear).await,
        KeyOutcome::ScrollUp(rows) => {
            let max = max_scroll_for(runtime.session(), theme, area);
            view.scroll_up(rows, max);
        }
        KeyOutcome::ScrollDown(rows) => view.scroll_down(rows),
        KeyOutcome::PageUp => {
            let max = max_scroll_for(runtime.session(), theme, area);
            view.scroll_up(visible_rows.max(1), max);
        }
        KeyOutcome::PageDown => view.scroll_down(visible_rows.max(1)),
        KeyOutcome::Edit(op) => {
            if view.edit(op) {
                runtime
                    .dispatch(SessionAction::InputChanged {
                        length: view.input.char_len(),
                    })
                    .await;
            }
        }
        KeyOutcome::Ignored => {}
    }
    LoopControl::Continue
}

async fn handle_ui_event<S, A>(
    event: UiEvent,
    view: &mut ChatView,
    runtime: &mut SessionRuntime<S, A>,
    area: Rect,
    theme: &Theme,
) -> LoopControl
where
    S: Store,
    A: ChatApi + 'static,
{
    match event {
        UiEvent::Crossterm(Event::Key(key)) => {
            let outcome = map_key(&key, runtime.session().is_clear_pending());
            apply_key_outcome(outcome, view, runtime, area, theme).await
        }
        UiEvent::Crossterm(Event::Paste(text)) => {
            if !runtime.session().is_clear_pending() {
                view.input.insert_str(&text);
                runtime
                    .dispatch(SessionAction::InputChanged {
                        length: view.input.char_len(),
                    })
                    .await;
            }
            LoopControl::Continue
        }
        UiEvent::Crossterm(_) => LoopControl::Continue,
    }
}

pub async fn run_chat(options: ChatOptions) -> Result<(), Box<dyn Error>> {
    let ChatOptions {
        base_url,
        request_timeout,
        data_dir,
        theme,
    } = options;

    let store = FileStore::new(&data_dir);
    let api = HttpChatApi::new(base_url.clone(), request_timeout)?;
    let (dispatcher, mut action_rx) = ActionDispatcher::channel();
    let mut runtime = SessionRuntime::new(store, api).with_dispatcher(dispatcher);
    runtime.start().await;
    info!(%base_url, data_dir = %data_dir.display(), "chat session started");

    let mut terminal = setup_terminal()?;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader = spawn_event_reader(event_tx);

    let mut view = ChatView::default();
    let mut frame_tick = tokio::time::interval(FRAME_INTERVAL);
    let mut request_redraw = true;

    let result: Result<(), Box<dyn Error>> = 'main_loop: loop {
        if request_redraw {
            let ctx = RenderContext {
                session: runtime.session(),
                input: &view.input,
                theme: &theme,
                scroll_from_bottom: view.scroll_from_bottom,
                pending_elapsed: runtime
                    .session()
                    .in_flight()
                    .map(|in_flight| in_flight.started.elapsed()),
            };
            if let Err(err) = terminal.draw(|f| renderer::ui(f, &ctx)) {
                break 'main_loop Err(err.into());
            }
            request_redraw = false;
        }

        tokio::select! {
            maybe_event = event_rx.recv() => {
                let Some(event) = maybe_event else {
                    break 'main_loop Ok(());
                };
                let area = match terminal.size() {
                    Ok(size) => Rect::new(0, 0, size.width, size.height),
                    Err(err) => break 'main_loop Err(err.into()),
                };
                if handle_ui_event(event, &mut view, &mut runtime, area, &theme).await
                    == LoopControl::Exit
                {
                    break 'main_loop Ok(());
                }
                request_redraw = true;
            }
            Some(action) = action_rx.recv() => {
                debug!(?action, "applying background action");
                runtime.dispatch(action).await;
                request_redraw = true;
            }
            _ = frame_tick.tick() => {
                if runtime.session().shows_pending_reply() {
                    request_redraw = true;
                }
            }
        }
    };

    drop(event_rx);
    let restored = restore_terminal(&mut terminal);
    let _ = event_reader.await;
    info!("chat session ended");

    result?;
    restored
}
