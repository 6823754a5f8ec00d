use std::cell::RefCell;
use std::rc::Rc;

use gtk4::prelude::*;
use gtk4::{ApplicationWindow, Dialog, Label, ResponseType, Switch};

use super::app::AppGame;
use crate::game::types::Side;
use crate::i18n::I18n;
use crate::sound::SoundPlayer;
use crate::storage::{self, Settings};

fn pad_button(btn: &gtk4::Widget) {
    btn.set_margin_start(8);
    btn.set_margin_end(8);
    btn.set_margin_top(6);
    btn.set_margin_bottom(6);
}

fn pad_content(dialog: &Dialog) -> gtk4::Box {
    let content = dialog.content_area();
    content.set_spacing(12);
    content.set_margin_start(16);
    content.set_margin_end(16);
    content.set_margin_top(12);
    content.set_margin_bottom(12);
    content
}

/// Show the settings dialog (sound on/off, reset all-time record).
pub fn show_settings_dialog(
    parent: &ApplicationWindow,
    game: Rc<RefCell<AppGame>>,
    settings: Rc<RefCell<Settings>>,
    sound: Rc<SoundPlayer>,
    i18n: &I18n,
) {
    let dialog = Dialog::new();
    dialog.set_transient_for(Some(parent));
    dialog.set_modal(true);
    dialog.set_destroy_with_parent(true);
    dialog.set_title(Some(&i18n.t("settings-title")));
    dialog.set_default_width(360);

    let ok_btn = dialog.add_button(&i18n.t("ok"), ResponseType::Accept);
    let cancel_btn = dialog.add_button(&i18n.t("cancel"), ResponseType::Cancel);
    pad_button(&ok_btn);
    pad_button(&cancel_btn);

    let content = pad_content(&dialog);

    // ── Sound ──
    let sound_switch = Switch::new();
    sound_switch.set_active(settings.borrow().sound_enabled);
    sound_switch.set_sensitive(sound.is_available());
    let sound_key = if sound.is_available() {
        "settings-sound"
    } else {
        "settings-sound-missing"
    };
    content.append(&switch_row(&i18n.t(sound_key), &sound_switch));

    // ── Reset statistics ──
    let reset_switch = Switch::new();
    reset_switch.set_active(false);
    content.append(&switch_row(&i18n.t("settings-reset"), &reset_switch));

    dialog.connect_response(move |dialog, response| {
        if response == ResponseType::Accept {
            if reset_switch.is_active() {
                game.borrow_mut().reset_statistics();
            }

            let mut s = settings.borrow_mut();
            s.sound_enabled = sound_switch.is_active();
            sound.set_enabled(s.sound_enabled);
            if let Err(e) = storage::save_settings(&s) {
                log::warn!("could not save settings: {e}");
            }
        }
        dialog.close();
    });

    dialog.show();
}

fn switch_row(text: &str, switch: &Switch) -> gtk4::Box {
    let row = gtk4::Box::new(gtk4::Orientation::Horizontal, 8);
    let label = Label::new(Some(text));
    label.set_hexpand(true);
    label.set_xalign(0.0);
    row.append(&label);
    row.append(switch);
    row
}

/// Announce the match winner and ask for another match.
/// `on_answer(true)` means play again.
pub fn ask_play_again(
    parent: &ApplicationWindow,
    i18n: &I18n,
    winner: Side,
    on_answer: impl Fn(bool) + 'static,
) {
    let dialog = Dialog::with_buttons(
        Some(&i18n.t("gameover-title")),
        Some(parent),
        gtk4::DialogFlags::MODAL | gtk4::DialogFlags::DESTROY_WITH_PARENT,
        &[
            (&i18n.t("yes"), ResponseType::Yes),
            (&i18n.t("no"), ResponseType::No),
        ],
    );
    dialog.set_deletable(false);

    let content = pad_content(&dialog);
    let key = match winner {
        Side::Player => "gameover-player",
        Side::Cpu => "gameover-cpu",
    };
    let label = Label::new(Some(&i18n.t(key)));
    label.set_wrap(true);
    content.append(&label);

    dialog.connect_response(move |dialog, response| {
        dialog.close();
        on_answer(response == ResponseType::Yes);
    });

    dialog.show();
}

/// Show a simple info message box.
pub fn show_info(parent: &ApplicationWindow, title: &str, message: &str, i18n: &I18n) {
    let dialog = Dialog::new();
    dialog.set_transient_for(Some(parent));
    dialog.set_modal(true);
    dialog.set_destroy_with_parent(true);
    dialog.set_title(Some(title));
    let ok_btn = dialog.add_button(&i18n.t("ok"), ResponseType::Accept);
    pad_button(&ok_btn);

    let content = pad_content(&dialog);
    let label = Label::new(Some(message));
    label.set_wrap(true);
    content.append(&label);

    dialog.connect_response(|dialog, _| {
        dialog.close();
    });

    dialog.show();
}
