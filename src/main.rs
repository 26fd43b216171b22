//! Terminal 2048 runner (default binary).
//!
//! Uses crossterm for input and the framebuffer renderer from `tui-2048-term`.
//! Keys and mouse drags play the game; an optional TCP adapter lets an
//! external agent play it too.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::info;

use tui_2048::adapter::{
    build_observation, create_ack, Adapter, InboundCommand, InboundPayload, OutboundMessage,
};
use tui_2048::core::{GameSnapshot, GameState, SimpleRng};
use tui_2048::input::{should_quit, InputHandler, SwipeTracker};
use tui_2048::term::{AdapterStatusView, FrameBuffer, GameView, TerminalRenderer, Viewport};
use tui_2048::types::{GameAction, TICK_MS};
use tui_2048::{logging, AppConfig};

fn main() -> Result<()> {
    let config = AppConfig::from_env()?;
    logging::init(&config)?;

    // Start before the terminal switches screens so a busy port is reported plainly.
    let adapter = Adapter::start_from_env()?;

    let mut term = TerminalRenderer::new().with_mouse_capture(true);
    term.enter()?;

    let result = run(&mut term, &config, adapter);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// Game plus the adapter it reports to.
struct Session {
    game: GameState,
    adapter: Option<Adapter>,
    observation_seq: u64,
}

impl Session {
    fn apply(&mut self, action: GameAction) {
        if self.game.apply_action(action) {
            self.broadcast_observation();
        }
    }

    fn broadcast_observation(&mut self) {
        let Some(adapter) = self.adapter.as_ref() else {
            return;
        };
        self.observation_seq += 1;
        let obs = build_observation(&self.game, self.observation_seq);
        adapter.send(OutboundMessage::BroadcastObservation { obs });
    }

    fn drain_adapter(&mut self) {
        loop {
            let Some(InboundCommand {
                client_id,
                seq,
                payload,
            }) = self.adapter.as_mut().and_then(Adapter::try_recv)
            else {
                return;
            };

            match payload {
                InboundPayload::Actions(actions) => {
                    for action in actions {
                        self.game.apply_action(action);
                    }
                    if let Some(adapter) = self.adapter.as_ref() {
                        adapter.send(OutboundMessage::ToClientAck {
                            client_id,
                            ack: create_ack(seq),
                        });
                    }
                    self.broadcast_observation();
                }
                InboundPayload::SnapshotRequest => {
                    if let Some(adapter) = self.adapter.as_ref() {
                        self.observation_seq += 1;
                        let obs = build_observation(&self.game, self.observation_seq);
                        adapter.send(OutboundMessage::ToClientObservation { client_id, obs });
                    }
                }
            }
        }
    }

    fn adapter_status(&self) -> Option<AdapterStatusView> {
        self.adapter.as_ref().map(|a| {
            let st = a.status();
            AdapterStatusView {
                enabled: true,
                client_count: st.client_count,
                controller_id: st.controller_id,
                streaming_count: st.streaming_count,
            }
        })
    }
}

fn run(term: &mut TerminalRenderer, config: &AppConfig, adapter: Option<Adapter>) -> Result<()> {
    let seed = config.seed.unwrap_or_else(|| SimpleRng::from_entropy().1);
    info!(
        seed,
        size = config.engine.size,
        target = config.engine.win_target,
        adapter = adapter.is_some(),
        "game started"
    );

    let mut session = Session {
        game: GameState::new(config.engine, seed),
        adapter,
        observation_seq: 0,
    };

    let view = GameView::default();
    let mut input_handler = InputHandler::with_cooldown_ms(config.move_cooldown_ms);
    let mut swipe = SwipeTracker::new();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snapshot = GameSnapshot::default();

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        // Agent commands skip the cooldown; it only debounces human input.
        session.drain_adapter();

        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        session.game.snapshot_into(&mut snapshot);
        let status = session.adapter_status();
        view.render_into_with_adapter(&snapshot, status.as_ref(), Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration.saturating_sub(last_tick.elapsed());

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        info!(
                            score = session.game.score(),
                            moves = session.game.moves(),
                            "quit"
                        );
                        return Ok(());
                    }
                    if let Some(action) = input_handler.handle_key_event(key) {
                        session.apply(action);
                    }
                }
                Event::Mouse(mouse) => {
                    if let Some(action) = swipe
                        .handle_mouse_event(mouse)
                        .and_then(|dir| input_handler.handle_direction(dir))
                    {
                        session.apply(action);
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        let elapsed = last_tick.elapsed();
        if elapsed >= tick_duration {
            last_tick = Instant::now();
            input_handler.update(elapsed.as_millis().min(u32::MAX as u128) as u32);
        }
    }
}
