use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::{Rc, Weak};
use std::time::Duration;

use fluent_bundle::FluentArgs;
use gtk4::gdk::Display;
use gtk4::gio::{Menu, SimpleAction};
use gtk4::prelude::*;
use gtk4::{
    Application, ApplicationWindow, Box as GtkBox, CssProvider, HeaderBar, Label, MenuButton,
    Orientation, PolicyType, ScrolledWindow, TextView, WrapMode,
    STYLE_PROVIDER_PRIORITY_APPLICATION,
};

use super::animation::{self, GlibScheduler, Reveal, Scheduler};
use super::buttons::ChoicePad;
use super::dialogs;
use crate::ai;
use crate::game::logic::{Game, GameEvent};
use crate::game::types::{AllTimeStats, Choice, MatchScore, RoundOutcome, RoundRecord};
use crate::i18n::I18n;
use crate::sound::{Cue, SoundPlayer};
use crate::storage::{self, JsonFileStore, Settings};

pub type AppGame = Game<JsonFileStore>;

const OUTCOME_CLASSES: [&str; 3] = ["outcome-win", "outcome-loss", "outcome-draw"];

/// Widgets that mirror game state.
struct View {
    all_time: Label,
    score: Label,
    result: Label,
    choice: Label,
    round: Label,
    log: TextView,
    pad: ChoicePad,
}

impl View {
    fn show_stats(&self, i18n: &I18n, stats: AllTimeStats) {
        let mut args = FluentArgs::new();
        args.set("player", stats.player_wins);
        args.set("cpu", stats.cpu_wins);
        self.all_time.set_text(&i18n.t_args("all-time-record", &args));
    }

    fn show_score(&self, i18n: &I18n, score: MatchScore, round: u32) {
        let mut args = FluentArgs::new();
        args.set("player", score.player);
        args.set("cpu", score.cpu);
        self.score.set_text(&i18n.t_args("match-score", &args));

        let mut args = FluentArgs::new();
        args.set("round", round);
        self.round.set_text(&i18n.t_args("round-counter", &args));
    }

    fn set_result(&self, text: &str, class: Option<&str>) {
        for c in OUTCOME_CLASSES {
            self.result.remove_css_class(c);
        }
        if let Some(c) = class {
            self.result.add_css_class(c);
        }
        self.result.set_text(text);
    }

    fn clear_log(&self) {
        self.log.buffer().set_text("");
    }

    fn append_log(&self, line: &str) {
        let buffer = self.log.buffer();
        let mut end = buffer.end_iter();
        buffer.insert(&mut end, &format!("{line}\n"));
        buffer.place_cursor(&buffer.end_iter());
        self.log.scroll_mark_onscreen(&buffer.get_insert());
    }
}

fn log_line(i18n: &I18n, record: &RoundRecord) -> String {
    let result_key = match record.outcome {
        RoundOutcome::PlayerWin => "log-result-win",
        RoundOutcome::CpuWin => "log-result-loss",
        RoundOutcome::Draw => "log-result-draw",
    };
    let mut args = FluentArgs::new();
    args.set("round", record.number);
    args.set("result", i18n.t(result_key));
    args.set("player", i18n.choice(record.player));
    args.set("cpu", i18n.choice(record.cpu));
    i18n.t_args("log-round", &args)
}

/// Apply one game event to the window.
fn on_event(
    event: &GameEvent,
    view: &View,
    i18n: &Rc<I18n>,
    sound: &SoundPlayer,
    window: &ApplicationWindow,
    game: &Weak<RefCell<AppGame>>,
) {
    match event {
        GameEvent::MatchStarted => {
            view.show_score(i18n, MatchScore::default(), 0);
            view.set_result(&i18n.t("status-new-match"), None);
            view.choice.set_text(&i18n.t("status-first-to"));
            view.clear_log();
            view.append_log(&i18n.t("log-new-match"));
            view.pad.set_enabled(true);
        }

        GameEvent::RoundPlayed { record, score } => {
            let mut args = FluentArgs::new();
            args.set("player", i18n.choice(record.player));
            args.set("cpu", i18n.choice(record.cpu));
            view.choice.set_text(&i18n.t_args("reveal-both", &args));
            let (key, class) = match record.outcome {
                RoundOutcome::PlayerWin => {
                    sound.play(Cue::Win);
                    ("status-round-win", "outcome-win")
                }
                RoundOutcome::CpuWin => {
                    sound.play(Cue::Loss);
                    ("status-round-loss", "outcome-loss")
                }
                RoundOutcome::Draw => ("status-round-draw", "outcome-draw"),
            };
            view.set_result(&i18n.t(key), Some(class));
            view.append_log(&log_line(i18n, record));
            view.show_score(i18n, *score, record.number);
            view.pad.set_enabled(true);
        }

        GameEvent::MatchCompleted { winner, stats } => {
            view.show_stats(i18n, *stats);
            view.pad.set_enabled(false);

            let game = game.clone();
            let win = window.clone();
            dialogs::ask_play_again(window, i18n, *winner, move |again| {
                if !again {
                    win.close();
                    return;
                }
                if let Some(game) = game.upgrade() {
                    game.borrow_mut().new_match();
                }
            });
        }

        GameEvent::StatsChanged(stats) => view.show_stats(i18n, *stats),
    }
}

fn save_window_geometry(win: &ApplicationWindow, settings: &RefCell<Settings>) {
    let mut s = settings.borrow_mut();
    s.window_width = Some(win.width());
    s.window_height = Some(win.height());
    if let Err(e) = storage::save_settings(&s) {
        log::warn!("could not save settings: {e}");
    }
}

fn label(class: &str) -> Label {
    let l = Label::new(None);
    l.add_css_class(class);
    l.set_wrap(true);
    l
}

/// Build and present the main application window.
pub fn build_ui(app: &Application, resources_dir: &Path) {
    // ── Shared state ──
    let settings = Rc::new(RefCell::new(storage::load_settings()));
    let store = JsonFileStore::in_config_dir();
    log::info!("statistics file: {}", store.path().display());
    let game = Rc::new(RefCell::new(Game::new(store)));
    let i18n = Rc::new(I18n::load_from_dir(resources_dir));
    let sound = Rc::new(SoundPlayer::load(
        resources_dir,
        settings.borrow().sound_enabled,
    ));
    let scheduler: Rc<dyn Scheduler> = Rc::new(GlibScheduler);
    // Set while the computer is "choosing"; blocks new picks and new matches.
    let busy = Rc::new(Cell::new(false));

    // ── CSS ──
    let provider = CssProvider::new();
    let css = "
        .title-label   { font-weight: 700; font-size: 15px; }
        .main-area     { background-color: #1e1e2f; color: #f9f9f9; }
        .all-time      { font-size: 12px; color: #bdc3c7; }
        .match-score   { font-size: 20px; font-weight: 700; color: #f1c40f; }
        .result        { font-size: 14px; }
        .choice        { font-size: 14px; color: #dcdcdc; }
        .round         { font-size: 14px; color: #f1c40f; }
        .log-title     { font-weight: 700; }
        .outcome-win   { color: #2ecc71; }
        .outcome-loss  { color: #e74c3c; }
        .outcome-draw  { color: #3498db; }
    ";
    provider.load_from_data(css);
    if let Some(display) = Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }

    // ── Window ──
    let window = ApplicationWindow::builder()
        .application(app)
        .title(&i18n.t("app-title"))
        .default_width(500)
        .default_height(720)
        .resizable(true)
        .build();
    if let (Some(w), Some(h)) = {
        let s = settings.borrow();
        (s.window_width, s.window_height)
    } {
        window.set_default_size(w, h);
    }

    // ── Header bar ──
    let header = HeaderBar::new();
    header.set_show_title_buttons(true);
    let header_title = Label::new(Some(&i18n.t("app-title")));
    header_title.add_css_class("title-label");
    header.set_title_widget(Some(&header_title));

    let menu = Menu::new();
    menu.append(Some(&i18n.t("menu-new-match")), Some("win.new-match"));
    let section2 = Menu::new();
    section2.append(Some(&i18n.t("menu-settings")), Some("win.settings"));
    section2.append(Some(&i18n.t("menu-info")), Some("win.info"));
    menu.append_section(None, &section2);

    let menu_button = MenuButton::new();
    menu_button.set_icon_name("open-menu-symbolic");
    menu_button.set_menu_model(Some(&menu));
    header.pack_end(&menu_button);

    // ── Main layout ──
    let main_box = GtkBox::new(Orientation::Vertical, 10);
    main_box.add_css_class("main-area");
    main_box.set_margin_top(10);
    main_box.set_margin_bottom(10);
    main_box.set_margin_start(20);
    main_box.set_margin_end(20);

    let log = TextView::new();
    log.set_editable(false);
    log.set_cursor_visible(false);
    log.set_wrap_mode(WrapMode::WordChar);
    let log_scroll = ScrolledWindow::new();
    log_scroll.set_policy(PolicyType::Never, PolicyType::Automatic);
    log_scroll.set_min_content_height(110);
    log_scroll.set_vexpand(true);
    log_scroll.set_child(Some(&log));

    let view = Rc::new(View {
        all_time: label("all-time"),
        score: label("match-score"),
        result: label("result"),
        choice: label("choice"),
        round: label("round"),
        log,
        pad: ChoicePad::new(i18n.clone()),
    });

    // ── Player picks ──
    {
        let weak_view = Rc::downgrade(&view);
        let game = game.clone();
        let i18n = i18n.clone();
        let sound = sound.clone();
        let scheduler = scheduler.clone();
        let settings = settings.clone();
        let busy = busy.clone();
        view.pad.connect_pick(move |player: Choice| {
            let Some(view) = weak_view.upgrade() else {
                return;
            };
            if busy.get() || game.borrow().current().is_complete() {
                return;
            }
            busy.set(true);
            sound.play(Cue::Click);
            view.pad.set_enabled(false);
            view.set_result(&i18n.t("status-choosing"), None);
            view.choice.set_text("");

            let reveal = {
                let s = settings.borrow();
                Reveal::new(s.reveal_steps, Duration::from_millis(s.reveal_interval_ms))
            };
            let flicker_view = view.clone();
            let flicker_i18n = i18n.clone();
            let game = game.clone();
            let busy = busy.clone();
            animation::run_reveal(
                scheduler.clone(),
                reveal,
                move |shown| {
                    let mut args = FluentArgs::new();
                    args.set("choice", flicker_i18n.choice(shown));
                    flicker_view
                        .choice
                        .set_text(&flicker_i18n.t_args("reveal-cpu", &args));
                },
                move || {
                    busy.set(false);
                    let cpu = ai::computer_choice(&mut rand::thread_rng());
                    if let Err(e) = game.borrow_mut().play_round(player, cpu) {
                        log::warn!("round ignored: {e}");
                    }
                },
            );
        });
    }

    main_box.append(&view.all_time);
    main_box.append(&view.score);
    main_box.append(&view.result);
    main_box.append(&view.choice);
    main_box.append(&view.round);
    main_box.append(view.pad.widget());
    let log_title = Label::new(Some(&i18n.t("log-title")));
    log_title.add_css_class("log-title");
    main_box.append(&log_title);
    main_box.append(&log_scroll);

    // ── Observer ──
    {
        let view = view.clone();
        let i18n = i18n.clone();
        let sound = sound.clone();
        let window = window.clone();
        let weak_game = Rc::downgrade(&game);
        game.borrow_mut().subscribe(move |event| {
            on_event(event, &view, &i18n, &sound, &window, &weak_game);
        });
    }
    view.show_stats(&i18n, game.borrow().stats());
    game.borrow_mut().new_match();

    // ── Actions ──
    // New match
    {
        let action = SimpleAction::new("new-match", None);
        let game = game.clone();
        let busy = busy.clone();
        action.connect_activate(move |_, _| {
            if busy.get() {
                return;
            }
            game.borrow_mut().new_match();
        });
        window.add_action(&action);
    }

    // Settings
    {
        let action = SimpleAction::new("settings", None);
        let game = game.clone();
        let settings = settings.clone();
        let sound = sound.clone();
        let i18n = i18n.clone();
        let win_for_closure = window.clone();
        action.connect_activate(move |_, _| {
            dialogs::show_settings_dialog(
                &win_for_closure,
                game.clone(),
                settings.clone(),
                sound.clone(),
                &i18n,
            );
        });
        window.add_action(&action);
    }

    // Info
    {
        let action = SimpleAction::new("info", None);
        let win_for_closure = window.clone();
        let i18n = i18n.clone();
        action.connect_activate(move |_, _| {
            let mut args = FluentArgs::new();
            args.set("version", env!("CARGO_PKG_VERSION"));
            let body = i18n.t_args("info-body", &args);
            dialogs::show_info(&win_for_closure, &i18n.t("menu-info"), &body, &i18n);
        });
        window.add_action(&action);
    }

    // ── Close: persist record and window size ──
    {
        let game = game.clone();
        let settings = settings.clone();
        window.connect_close_request(move |win| {
            save_window_geometry(win, &settings);
            game.borrow().shutdown();
            gtk4::Inhibit(false)
        });
    }

    window.set_titlebar(Some(&header));
    window.set_child(Some(&main_box));
    window.present();
}
