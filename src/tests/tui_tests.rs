use super::App;
use crate::config::StewardConfig;
use crate::exec::{ExecEvent, ExecOutcome, ExecRequest};
use crate::paths::SystemPaths;
use crate::toolkit::ToolkitCatalog;
use crate::tui::screen::{Banner, Ctx, Toast, View, TOAST_TICKS};
use crate::tui::screens::exec::ExecScreen;
use crate::tui::screens::Screen;
use crate::tui::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

fn app() -> App {
    App::new(
        SystemPaths::rooted("/steward-tui-fixture"),
        StewardConfig::default(),
        ToolkitCatalog::builtin(),
        Theme::plain(),
    )
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn top_title(app: &App) -> String {
    app.stack.last().map(|top| top.view_ref().title()).unwrap_or_default()
}

#[test]
fn any_key_dismisses_the_splash() {
    let mut app = app();
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.stack.len(), 1);
    assert_eq!(top_title(&app), "main menu");
}

#[test]
fn the_root_screen_never_pops() {
    let mut app = app();
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(key(KeyCode::Esc));
    app.handle_key(key(KeyCode::Backspace));
    assert_eq!(app.stack.len(), 1);
    assert!(!app.should_quit());
}

#[test]
fn menus_push_and_esc_pops() {
    let mut app = app();
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(key(KeyCode::Down));
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.stack.len(), 2);
    assert_eq!(top_title(&app), "configure services");

    app.handle_key(key(KeyCode::Esc));
    assert_eq!(app.stack.len(), 1);
    assert_eq!(top_title(&app), "main menu");
}

#[test]
fn q_and_ctrl_c_quit() {
    let mut app = app();
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(key(KeyCode::Char('q')));
    assert!(app.should_quit());

    let mut app = self::app();
    app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(app.should_quit());
}

#[test]
fn the_quit_item_on_the_main_menu_quits() {
    let mut app = app();
    app.handle_key(key(KeyCode::Enter));
    for _ in 0..10 {
        app.handle_key(key(KeyCode::Down));
    }
    app.handle_key(key(KeyCode::Enter));
    assert!(app.should_quit());
}

#[test]
fn a_banner_swallows_the_key_that_dismisses_it() {
    let mut app = app();
    app.handle_key(key(KeyCode::Enter));
    app.startup_warning("could not parse steward.toml".to_owned());

    app.handle_key(key(KeyCode::Char('q')));
    assert!(!app.should_quit(), "the dismissing key must not act");
    assert!(app.banner.is_none());

    app.handle_key(key(KeyCode::Char('q')));
    assert!(app.should_quit());
}

#[test]
fn a_pop_on_dismiss_banner_backs_out_of_the_screen() {
    let mut app = app();
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(key(KeyCode::Down));
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.stack.len(), 2);

    app.banner = Some(Banner::success("Saved", "restart to apply").pop_on_dismiss());
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.stack.len(), 1);
    assert_eq!(top_title(&app), "main menu");
}

#[test]
fn the_backups_stub_raises_a_banner() {
    let mut app = app();
    app.handle_key(key(KeyCode::Enter));
    for _ in 0..6 {
        app.handle_key(key(KeyCode::Down));
    }
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.stack.len(), 1);
    let banner = app.banner.as_ref().expect("stub banner");
    assert_eq!(banner.title, "Scheduled backups");
}

#[test]
fn a_finished_exec_screen_jumps_back_to_the_main_menu() {
    let mut app = app();
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(key(KeyCode::Down));
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.stack.len(), 2);

    let request = ExecRequest {
        command: "true".to_owned(),
        description: "noop".to_owned(),
        cwd: None,
    };
    let mut screen = ExecScreen::new(request);
    let mut ctx = Ctx::new(
        SystemPaths::rooted("/steward-tui-fixture"),
        StewardConfig::default(),
        ToolkitCatalog::builtin(),
    );
    screen.on_exec_event(
        &ExecEvent::Exit {
            outcome: ExecOutcome {
                success: true,
                detail: "exit=0".to_owned(),
            },
        },
        &mut ctx,
    );
    app.stack.push(Screen::Exec(screen));

    app.handle_key(key(KeyCode::Char('m')));
    assert_eq!(app.stack.len(), 1);
    assert_eq!(top_title(&app), "main menu");
}

#[test]
fn toasts_decay_on_their_own() {
    let mut app = app();
    app.toast = Some(Toast::new("copied to clipboard"));
    for _ in 0..TOAST_TICKS {
        app.tick();
    }
    assert!(app.toast.is_none());
}
