use std::io;
use std::process::ExitCode;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::debug;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use makelogs::catalog::{Catalog, PICKED_CAPTION};
use makelogs::config_file::load_all;
use makelogs::exit_code;
use makelogs::settings::Settings;
use makelogs::tui::app::App;

use crate::run::run_catalog;

/// Open the picker, then run the marked actions.
///
/// # Errors
///
/// Returns an error if a catalog cannot be loaded, terminal setup or the event
/// loop fails, or the run fails.
pub fn run(settings: &Settings) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let catalogs = load_all(&settings.resource_dir)?;
    let mut app = App::new(catalogs, &settings.lang);

    // Install panic hook that restores the terminal before printing the panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result?;

    if !app.confirmed {
        debug!("Picker closed without running");
        return Ok(ExitCode::SUCCESS);
    }
    let actions = app.marked_actions();
    if actions.is_empty() {
        eprintln!("Nothing selected");
        return Ok(ExitCode::from(exit_code::NO_RESULTS));
    }
    run_catalog(&Catalog::adhoc(PICKED_CAPTION, actions), settings)
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| app.render(frame))?;
        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key);
        }
    }
    Ok(())
}
