//! Input handling for a clipping session.
//!
//! The window layer turns toolkit input into [`InputEvent`]s and feeds them
//! to [`Session::dispatch`] one at a time. All mutable state lives in the
//! session; handlers never reach into the window.

use std::path::PathBuf;

use chrono::Local;
use log::{error, info, warn};

use crate::config::CropConfig;
use crate::crop;
use crate::error::{CropperError, Result};
use crate::mapper::Point;
use crate::store::ImageStore;
use crate::view::{self, ViewState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    Primary,
    Secondary,
    Middle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavKey {
    Next,
    Previous,
}

/// Positions are in canvas pixels, relative to the image's top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    PointerMove(Point),
    Click { pos: Point, button: Button },
    Key(NavKey),
    /// Signed wheel notches; positive zooms in, negative zooms out.
    Scroll(i32),
}

/// What a handled event changed, so the window knows what to redraw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Unchanged,
    PreviewMoved,
    /// The display image was regenerated and must be re-uploaded.
    ImageChanged,
    Cropped(PathBuf),
}

/// The crop footprint outline, in canvas space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PreviewRect {
    pub min: Point,
    pub max: Point,
    pub visible: bool,
}

impl PreviewRect {
    fn move_to(&mut self, anchor: Point, config: &CropConfig) {
        self.min = anchor;
        self.max = anchor.offset(config.crop_width as i32, config.crop_height as i32);
        self.visible = true;
    }
}

pub struct Session {
    store: ImageStore,
    view: ViewState,
    /// Store index of the image held by `view`, which lags the cursor
    /// after a failed load.
    shown: usize,
    config: CropConfig,
    preview: PreviewRect,
    output_dir: PathBuf,
}

impl Session {
    /// Opens the first image that decodes, starting at the store's cursor.
    pub fn start(
        mut store: ImageStore,
        config: CropConfig,
        output_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        for _ in 0..store.len() {
            match view::load(&store.current_path()) {
                Ok(original) => {
                    let view = ViewState::new(store.current(), original, 1.0);
                    info!(
                        "Opened {} ({}/{})",
                        store.current(),
                        store.index() + 1,
                        store.len()
                    );
                    return Ok(Self {
                        shown: store.index(),
                        store,
                        view,
                        config,
                        preview: PreviewRect::default(),
                        output_dir: output_dir.into(),
                    });
                }
                Err(e) => {
                    warn!("Skipping {}: {}", store.current(), e);
                    store.next();
                }
            }
        }
        Err(CropperError::NoDecodableImages(store.dir().to_path_buf()))
    }

    /// Handles one event to completion. Failures are logged and reported as
    /// [`Outcome::Unchanged`]; the session stays usable.
    pub fn dispatch(&mut self, event: InputEvent) -> Outcome {
        let result = match event {
            InputEvent::PointerMove(pos) => Ok(self.on_pointer_move(pos)),
            InputEvent::Click { pos, button } => self.on_click(pos, button),
            InputEvent::Key(key) => self.on_key(key),
            InputEvent::Scroll(delta) => self.on_scroll(delta),
        };
        result.unwrap_or_else(|e| {
            error!("{}", e);
            Outcome::Unchanged
        })
    }

    fn on_pointer_move(&mut self, pos: Point) -> Outcome {
        self.preview.move_to(pos, &self.config);
        Outcome::PreviewMoved
    }

    fn on_click(&mut self, pos: Point, button: Button) -> Result<Outcome> {
        if button != Button::Primary {
            return Ok(Outcome::Unchanged);
        }
        let path = crop::crop_and_save(
            pos,
            &self.view,
            &self.config,
            &self.output_dir,
            &Local::now(),
        )?;
        info!("Cropped image saved as {}", path.display());
        Ok(Outcome::Cropped(path))
    }

    fn on_key(&mut self, key: NavKey) -> Result<Outcome> {
        match key {
            NavKey::Next => self.store.next(),
            NavKey::Previous => self.store.previous(),
        };
        // On failure the previous image stays on screen and keeps its name.
        let original = view::load(&self.store.current_path())?;
        self.view.replace(self.store.current(), original);
        self.shown = self.store.index();
        info!(
            "Opened {} ({}/{})",
            self.store.current(),
            self.store.index() + 1,
            self.store.len()
        );
        Ok(Outcome::ImageChanged)
    }

    fn on_scroll(&mut self, notches: i32) -> Result<Outcome> {
        if notches == 0 {
            return Ok(Outcome::Unchanged);
        }
        for _ in 0..notches.unsigned_abs() {
            if notches > 0 {
                self.view.zoom_in()?;
            } else {
                self.view.zoom_out()?;
            }
        }
        Ok(Outcome::ImageChanged)
    }

    /// Returns whether the display image had to be regenerated.
    pub fn set_max_display_side(&mut self, side: u32) -> bool {
        let zoom = self.view.zoom();
        self.view.set_max_display_side(side);
        zoom != self.view.zoom()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// One-based position of the image on screen, and the folder size.
    pub fn position(&self) -> (usize, usize) {
        (self.shown + 1, self.store.len())
    }

    pub fn preview(&self) -> PreviewRect {
        self.preview
    }
}
