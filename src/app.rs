use eframe::egui;
use image::DynamicImage;

use crate::mapper::Point;
use crate::session::{Button, InputEvent, NavKey, Outcome, Session};

const PREVIEW_STROKE_WIDTH: f32 = 2.0;

pub struct ClipperApp {
    session: Session,
    texture: Option<egui::TextureHandle>,
    texture_stale: bool,
    max_texture_side: usize,
    input: InputTranslator,
    title: String,
}

impl ClipperApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, session: Session) -> Self {
        Self {
            session,
            texture: None,
            texture_stale: true,
            max_texture_side: 0,
            input: InputTranslator::default(),
            title: String::new(),
        }
    }

    fn load_texture(&mut self, ctx: &egui::Context) {
        let color_image = to_color_image(self.session.view().display());
        match &mut self.texture {
            Some(texture) => texture.set(color_image, egui::TextureOptions::LINEAR),
            None => {
                self.texture =
                    Some(ctx.load_texture("image", color_image, egui::TextureOptions::LINEAR));
            }
        }
        self.texture_stale = false;
    }

    fn update_title(&mut self, ctx: &egui::Context) {
        let (position, total) = self.session.position();
        let title = format!(
            "Image Clipper - {} ({}/{}) - {:.0}%",
            self.session.view().source_name(),
            position,
            total,
            self.session.view().zoom() * 100.0
        );
        if title != self.title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.title = title;
        }
    }
}

/// Wheel movement, in points, that counts as one notch.
const POINTS_PER_NOTCH: f32 = 50.0;

/// Turns egui input into session events, carrying pointer and partial
/// wheel state from one frame to the next.
#[derive(Default)]
struct InputTranslator {
    last_pointer: Option<Point>,
    pending_notches: f32,
}

impl InputTranslator {
    /// Events for one frame, in the order move, click, key, scroll.
    /// `hover` is the pointer in canvas pixels while it is over the canvas.
    fn translate(
        &mut self,
        input: &egui::InputState,
        hover: Option<Point>,
        to_canvas: impl Fn(egui::Pos2) -> Point,
    ) -> Vec<InputEvent> {
        let mut events = Vec::new();

        if let Some(pos) = hover {
            if self.last_pointer != Some(pos) {
                events.push(InputEvent::PointerMove(pos));
            }
        }
        self.last_pointer = hover;

        if let Some(hover) = hover {
            // Anchor at the press, not wherever the pointer ended the frame
            let pos = input.pointer.press_origin().map(&to_canvas).unwrap_or(hover);
            for (pointer_button, button) in [
                (egui::PointerButton::Primary, Button::Primary),
                (egui::PointerButton::Secondary, Button::Secondary),
                (egui::PointerButton::Middle, Button::Middle),
            ] {
                if input.pointer.button_pressed(pointer_button) {
                    events.push(InputEvent::Click { pos, button });
                }
            }
        }

        if input.key_pressed(egui::Key::ArrowLeft) {
            events.push(InputEvent::Key(NavKey::Previous));
        }
        if input.key_pressed(egui::Key::ArrowRight) {
            events.push(InputEvent::Key(NavKey::Next));
        }

        if hover.is_none() {
            self.pending_notches = 0.0;
            return events;
        }
        for event in &input.events {
            if let egui::Event::MouseWheel { unit, delta, .. } = event {
                self.pending_notches += match unit {
                    egui::MouseWheelUnit::Point => delta.y / POINTS_PER_NOTCH,
                    egui::MouseWheelUnit::Line | egui::MouseWheelUnit::Page => delta.y,
                };
            }
        }
        let notches = self.pending_notches.trunc();
        if notches != 0.0 {
            self.pending_notches -= notches;
            events.push(InputEvent::Scroll(notches as i32));
        }

        events
    }
}

impl eframe::App for ClipperApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let max_texture_side = ctx.input(|i| i.max_texture_side);
        if max_texture_side != self.max_texture_side {
            self.max_texture_side = max_texture_side;
            let side = u32::try_from(max_texture_side).unwrap_or(u32::MAX);
            self.texture_stale |= self.session.set_max_display_side(side);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(ctx.style().visuals.extreme_bg_color))
            .show(ctx, |ui| {
                let canvas_rect = ui.max_rect();
                let response = ui.allocate_rect(canvas_rect, egui::Sense::click());
                let origin = canvas_rect.min;

                let pixels_per_point = ctx.pixels_per_point();
                let to_canvas = |pos: egui::Pos2| canvas_point(pos, origin, pixels_per_point);
                let hover = response.hover_pos().map(to_canvas);
                let events = ctx.input(|i| self.input.translate(i, hover, to_canvas));

                for event in events {
                    match self.session.dispatch(event) {
                        Outcome::ImageChanged => self.texture_stale = true,
                        Outcome::Unchanged | Outcome::PreviewMoved | Outcome::Cropped(_) => {}
                    }
                }

                if self.texture_stale || self.texture.is_none() {
                    self.load_texture(ctx);
                }
                self.update_title(ctx);

                if response.hovered() {
                    ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
                }

                let painter = ui.painter_at(canvas_rect);

                // Draw image, one texel per physical pixel, anchored top-left
                if let Some(texture) = &self.texture {
                    let image_rect = egui::Rect::from_min_size(
                        origin,
                        texture.size_vec2() / pixels_per_point,
                    );
                    painter.image(
                        texture.id(),
                        image_rect,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );
                }

                // Preview goes on top of the image
                let preview = self.session.preview();
                if preview.visible {
                    let preview_rect = egui::Rect::from_min_max(
                        screen_pos(preview.min, origin, pixels_per_point),
                        screen_pos(preview.max, origin, pixels_per_point),
                    );
                    painter.rect_stroke(
                        preview_rect,
                        0.0,
                        egui::Stroke::new(PREVIEW_STROKE_WIDTH, egui::Color32::RED),
                    );
                }
            });
    }
}

fn to_color_image(image: &DynamicImage) -> egui::ColorImage {
    let size = [image.width() as _, image.height() as _];
    let image_buffer = image.to_rgba8();
    let pixels = image_buffer.as_flat_samples();
    egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice())
}

/// Screen position in points to canvas pixels relative to `origin`.
fn canvas_point(pos: egui::Pos2, origin: egui::Pos2, pixels_per_point: f32) -> Point {
    let offset = (pos - origin) * pixels_per_point;
    Point::new(offset.x.floor() as i32, offset.y.floor() as i32)
}

fn screen_pos(point: Point, origin: egui::Pos2, pixels_per_point: f32) -> egui::Pos2 {
    origin + egui::vec2(point.x as f32, point.y as f32) / pixels_per_point
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CropConfig;
    use crate::store::ImageStore;
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;

    /// Runs one headless frame with the canvas at the screen origin.
    fn frame(
        ctx: &egui::Context,
        translator: &mut InputTranslator,
        hover: Option<Point>,
        events: Vec<egui::Event>,
    ) -> Vec<InputEvent> {
        let raw = egui::RawInput {
            events,
            ..Default::default()
        };
        let mut translated = Vec::new();
        ctx.run(raw, |ctx| {
            translated = ctx.input(|i| {
                translator.translate(i, hover, |pos| canvas_point(pos, egui::Pos2::ZERO, 1.0))
            });
        });
        translated
    }

    fn wheel(unit: egui::MouseWheelUnit, y: f32) -> egui::Event {
        egui::Event::MouseWheel {
            unit,
            delta: egui::vec2(0.0, y),
            modifiers: egui::Modifiers::NONE,
        }
    }

    fn scrolls(events: &[InputEvent]) -> Vec<i32> {
        events
            .iter()
            .filter_map(|event| match event {
                InputEvent::Scroll(notches) => Some(*notches),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn every_wheel_line_in_a_frame_is_a_zoom_step() {
        let input = tempdir().unwrap();
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(100, 50, Rgba([1, 2, 3, 255])))
            .save(input.path().join("a.png"))
            .unwrap();
        let store = ImageStore::from_names(input.path(), vec!["a.png".to_string()]).unwrap();
        let mut session = Session::start(store, CropConfig::default(), input.path()).unwrap();

        let ctx = egui::Context::default();
        let mut translator = InputTranslator::default();
        let line = egui::MouseWheelUnit::Line;
        let events = frame(
            &ctx,
            &mut translator,
            Some(Point::new(5, 5)),
            vec![wheel(line, 1.0), wheel(line, 1.0)],
        );
        assert_eq!(scrolls(&events), [2]);

        for event in events {
            session.dispatch(event);
        }
        assert!((session.view().zoom() - 1.21).abs() < 1e-5);
    }

    #[test]
    fn wheel_down_zooms_out() {
        let ctx = egui::Context::default();
        let mut translator = InputTranslator::default();
        let hover = Some(Point::new(5, 5));
        let events = frame(
            &ctx,
            &mut translator,
            hover,
            vec![wheel(egui::MouseWheelUnit::Line, -1.0)],
        );
        assert_eq!(scrolls(&events), [-1]);
        let events = frame(
            &ctx,
            &mut translator,
            hover,
            vec![wheel(egui::MouseWheelUnit::Page, -2.0)],
        );
        assert_eq!(scrolls(&events), [-2]);
    }

    #[test]
    fn trackpad_deltas_accumulate_across_frames() {
        let ctx = egui::Context::default();
        let mut translator = InputTranslator::default();
        let hover = Some(Point::new(5, 5));
        let point = egui::MouseWheelUnit::Point;

        let events = frame(&ctx, &mut translator, hover, vec![wheel(point, 30.0)]);
        assert!(scrolls(&events).is_empty());
        let events = frame(&ctx, &mut translator, hover, vec![wheel(point, 30.0)]);
        assert_eq!(scrolls(&events), [1]);
        // 10 points left over, 40 more make the next notch
        let events = frame(&ctx, &mut translator, hover, vec![wheel(point, 40.0)]);
        assert_eq!(scrolls(&events), [1]);
    }

    #[test]
    fn wheel_outside_the_canvas_is_ignored() {
        let ctx = egui::Context::default();
        let mut translator = InputTranslator::default();
        let hover = Some(Point::new(5, 5));
        let point = egui::MouseWheelUnit::Point;

        let line = wheel(egui::MouseWheelUnit::Line, 1.0);
        assert!(frame(&ctx, &mut translator, None, vec![line]).is_empty());

        // A partial notch does not carry over a trip outside the canvas
        frame(&ctx, &mut translator, hover, vec![wheel(point, 30.0)]);
        frame(&ctx, &mut translator, None, vec![wheel(point, 30.0)]);
        let events = frame(&ctx, &mut translator, hover, vec![wheel(point, 30.0)]);
        assert!(scrolls(&events).is_empty());
    }

    #[test]
    fn click_is_anchored_where_the_button_went_down() {
        let ctx = egui::Context::default();
        let mut translator = InputTranslator::default();
        let events = frame(
            &ctx,
            &mut translator,
            Some(Point::new(30, 30)),
            vec![
                egui::Event::PointerMoved(egui::pos2(10.0, 10.0)),
                egui::Event::PointerButton {
                    pos: egui::pos2(12.0, 14.0),
                    button: egui::PointerButton::Primary,
                    pressed: true,
                    modifiers: egui::Modifiers::NONE,
                },
                egui::Event::PointerMoved(egui::pos2(30.0, 30.0)),
            ],
        );
        assert_eq!(
            events,
            [
                InputEvent::PointerMove(Point::new(30, 30)),
                InputEvent::Click {
                    pos: Point::new(12, 14),
                    button: Button::Primary,
                },
            ]
        );
    }

    #[test]
    fn pointer_move_is_sent_only_when_the_pixel_changes() {
        let ctx = egui::Context::default();
        let mut translator = InputTranslator::default();
        let hover = Some(Point::new(7, 8));
        let events = frame(&ctx, &mut translator, hover, Vec::new());
        assert_eq!(events, [InputEvent::PointerMove(Point::new(7, 8))]);
        assert!(frame(&ctx, &mut translator, hover, Vec::new()).is_empty());
    }

    #[test]
    fn canvas_points_are_physical_pixels_from_the_origin() {
        let origin = egui::pos2(10.0, 20.0);
        assert_eq!(canvas_point(egui::pos2(10.0, 20.0), origin, 1.0), Point::new(0, 0));
        assert_eq!(canvas_point(egui::pos2(15.7, 21.2), origin, 1.0), Point::new(5, 1));
        assert_eq!(canvas_point(egui::pos2(15.0, 25.0), origin, 2.0), Point::new(10, 10));
        assert_eq!(canvas_point(egui::pos2(9.5, 20.0), origin, 1.0), Point::new(-1, 0));
    }

    #[test]
    fn screen_pos_inverts_canvas_point() {
        let origin = egui::pos2(3.0, 4.0);
        for pixels_per_point in [1.0, 1.5, 2.0] {
            let point = Point::new(120, 48);
            let pos = screen_pos(point, origin, pixels_per_point);
            assert_eq!(canvas_point(pos, origin, pixels_per_point), point);
        }
    }

    #[test]
    fn color_image_keeps_display_size() {
        let image = DynamicImage::new_rgba8(7, 3);
        assert_eq!(to_color_image(&image).size, [7, 3]);
    }
}
