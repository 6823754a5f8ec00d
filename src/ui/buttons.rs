use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use cairo::{Context, FontSlant, FontWeight};
use gtk4::prelude::*;
use gtk4::{DrawingArea, EventControllerMotion, GestureClick};

use crate::game::types::Choice;
use crate::i18n::I18n;

// Reference layout; everything is scaled to fit the widget.
const REF_WIDTH: f64 = 450.0;
const REF_HEIGHT: f64 = 200.0;
const RADIUS: f64 = 50.0;
const CENTER_Y: f64 = 100.0;
const CENTERS_X: [f64; 3] = [80.0, 225.0, 370.0];

fn colour(choice: Choice) -> (f64, f64, f64) {
    match choice {
        Choice::Snake => rgb(0x8e, 0x44, 0xad),
        Choice::Water => rgb(0x16, 0xa0, 0x85),
        Choice::Gun => rgb(0xc0, 0x39, 0x2b),
    }
}

fn rgb(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    (r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
}

#[derive(Debug, Default)]
struct PadState {
    hovered: Option<Choice>,
    disabled: bool,
}

type PickHandler = Rc<dyn Fn(Choice)>;

/// Three round buttons, one per choice, drawn with cairo.
pub struct ChoicePad {
    area: DrawingArea,
    state: Rc<RefCell<PadState>>,
    on_pick: Rc<RefCell<Option<PickHandler>>>,
}

impl ChoicePad {
    pub fn new(i18n: Rc<I18n>) -> Self {
        let area = DrawingArea::new();
        area.set_content_width(REF_WIDTH as i32);
        area.set_content_height(REF_HEIGHT as i32);
        area.set_hexpand(true);
        let state = Rc::new(RefCell::new(PadState::default()));
        let on_pick: Rc<RefCell<Option<PickHandler>>> = Rc::new(RefCell::new(None));

        {
            let state = state.clone();
            area.set_draw_func(move |_, cr, w, h| {
                let st = state.borrow();
                render(cr, &i18n, &st, w, h);
            });
        }

        {
            let state = state.clone();
            let on_pick = on_pick.clone();
            let da = area.clone();
            let click = GestureClick::new();
            click.connect_released(move |_gesture, _n, x, y| {
                if state.borrow().disabled {
                    return;
                }
                let Some(choice) = hit_test(x, y, da.width(), da.height()) else {
                    return;
                };
                // Clone out so the handler may touch the pad itself.
                let handler = on_pick.borrow().clone();
                if let Some(handler) = handler {
                    handler(choice);
                }
            });
            area.add_controller(click);
        }

        {
            let motion = EventControllerMotion::new();
            let hover_state = state.clone();
            let hover_da = area.clone();
            motion.connect_motion(move |_ctrl, x, y| {
                let hovered = hit_test(x, y, hover_da.width(), hover_da.height());
                let mut st = hover_state.borrow_mut();
                if st.hovered != hovered {
                    st.hovered = hovered;
                    drop(st);
                    hover_da.queue_draw();
                }
            });
            let leave_state = state.clone();
            let leave_da = area.clone();
            motion.connect_leave(move |_ctrl| {
                leave_state.borrow_mut().hovered = None;
                leave_da.queue_draw();
            });
            area.add_controller(motion);
        }

        Self {
            area,
            state,
            on_pick,
        }
    }

    /// Set the handler run when an enabled button is clicked.
    pub fn connect_pick(&self, handler: impl Fn(Choice) + 'static) {
        *self.on_pick.borrow_mut() = Some(Rc::new(handler));
    }

    pub fn widget(&self) -> &DrawingArea {
        &self.area
    }

    /// Disabled buttons are drawn faded and ignore clicks.
    pub fn set_enabled(&self, enabled: bool) {
        self.state.borrow_mut().disabled = !enabled;
        self.area.queue_draw();
    }
}

fn layout(widget_w: i32, widget_h: i32) -> (f64, f64, f64) {
    let w = widget_w as f64;
    let h = widget_h as f64;
    let scale = (w / REF_WIDTH).min(h / REF_HEIGHT);
    let offset_x = (w - REF_WIDTH * scale) / 2.0;
    let offset_y = (h - REF_HEIGHT * scale) / 2.0;
    (scale, offset_x, offset_y)
}

/// Which button, if any, lies under a widget-space point.
fn hit_test(x: f64, y: f64, widget_w: i32, widget_h: i32) -> Option<Choice> {
    let (scale, offset_x, offset_y) = layout(widget_w, widget_h);
    if scale <= 0.0 {
        return None;
    }
    let rx = (x - offset_x) / scale;
    let ry = (y - offset_y) / scale;
    Choice::ALL
        .into_iter()
        .zip(CENTERS_X)
        .find(|(_, cx)| (rx - cx).powi(2) + (ry - CENTER_Y).powi(2) <= RADIUS * RADIUS)
        .map(|(choice, _)| choice)
}

fn render(cr: &Context, i18n: &I18n, st: &PadState, widget_w: i32, widget_h: i32) {
    let (scale, offset_x, offset_y) = layout(widget_w, widget_h);
    let alpha = if st.disabled { 0.4 } else { 1.0 };

    let _ = cr.save();
    cr.translate(offset_x, offset_y);
    cr.scale(scale, scale);
    cr.select_font_face("Sans", FontSlant::Normal, FontWeight::Bold);
    cr.set_font_size(14.0);

    for (choice, cx) in Choice::ALL.into_iter().zip(CENTERS_X) {
        let hovered = !st.disabled && st.hovered == Some(choice);
        let (r, g, b) = if hovered {
            rgb(0x55, 0x55, 0x55)
        } else {
            colour(choice)
        };

        cr.arc(cx, CENTER_Y, RADIUS, 0.0, TAU);
        cr.set_source_rgba(r, g, b, alpha);
        let _ = cr.fill_preserve();
        if hovered {
            let (r, g, b) = rgb(0xf1, 0xc4, 0x0f);
            cr.set_source_rgb(r, g, b);
        } else {
            cr.set_source_rgba(1.0, 1.0, 1.0, alpha);
        }
        cr.set_line_width(3.0);
        let _ = cr.stroke();

        let label = i18n.choice(choice);
        if let Ok(ext) = cr.text_extents(&label) {
            cr.move_to(
                cx - ext.width() / 2.0 - ext.x_bearing(),
                CENTER_Y - ext.height() / 2.0 - ext.y_bearing(),
            );
            cr.set_source_rgba(1.0, 1.0, 1.0, alpha);
            let _ = cr.show_text(&label);
        }
    }

    let _ = cr.restore();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centres_hit_their_own_button() {
        let w = REF_WIDTH as i32;
        let h = REF_HEIGHT as i32;
        assert_eq!(hit_test(80.0, 100.0, w, h), Some(Choice::Snake));
        assert_eq!(hit_test(225.0, 140.0, w, h), Some(Choice::Water));
        assert_eq!(hit_test(410.0, 100.0, w, h), Some(Choice::Gun));
    }

    #[test]
    fn gaps_and_corners_hit_nothing() {
        let w = REF_WIDTH as i32;
        let h = REF_HEIGHT as i32;
        assert_eq!(hit_test(152.0, 100.0, w, h), None);
        assert_eq!(hit_test(0.0, 0.0, w, h), None);
        assert_eq!(hit_test(10.0, 10.0, 0, 0), None);
    }

    #[test]
    fn hit_test_follows_scaling_and_centring() {
        // Twice the width, same height: scale stays 1, content centred.
        let w = (REF_WIDTH * 2.0) as i32;
        let h = REF_HEIGHT as i32;
        let shift = REF_WIDTH / 2.0;
        assert_eq!(hit_test(80.0, 100.0, w, h), None);
        assert_eq!(hit_test(80.0 + shift, 100.0, w, h), Some(Choice::Snake));

        // Double size in both directions.
        let w = (REF_WIDTH * 2.0) as i32;
        let h = (REF_HEIGHT * 2.0) as i32;
        assert_eq!(hit_test(740.0, 200.0, w, h), Some(Choice::Gun));
    }
}
