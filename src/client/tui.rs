//! Terminal event loop for the quiz client.

use std::{error::Error, time::Duration};

use crossterm::event::{self, Event};

use crate::client::{
    api::QuizGenerator,
    app::{ClientApp, KeyOutcome},
    terminal::{self, AppTerminal},
    ui,
};

/// Short enough for the countdown to redraw every second.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs the client until the user quits. The terminal is restored even
/// when the loop fails.
pub async fn run(generator: &dyn QuizGenerator, service_url: &str) -> Result<(), Box<dyn Error>> {
    let mut terminal = terminal::init()?;
    let result = event_loop(&mut terminal, generator, service_url).await;
    terminal::restore()?;
    result
}

async fn event_loop(
    terminal: &mut AppTerminal,
    generator: &dyn QuizGenerator,
    service_url: &str,
) -> Result<(), Box<dyn Error>> {
    let mut app = ClientApp::new(service_url);

    loop {
        app.drain_timer_events();
        terminal.draw(|frame| ui::render(frame, &app))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };

        match app.handle_key(key) {
            KeyOutcome::Continue => {}
            KeyOutcome::Generate => {
                terminal.draw(|frame| ui::render(frame, &app))?;
                app.generate(generator).await;
            }
            KeyOutcome::Quit => break,
        }
    }

    log::info!("Client exiting");
    Ok(())
}
