//! Line visuals with attached filter chains.
//!
//! Six line visuals share one set of vertex positions but carry different
//! transforms and filters: plain, clipped, faded, tinted, hatched, and
//! tinted+hatched. Resizing the window reconfigures every transform system
//! and re-derives the clip bounds from a reference region.

mod data;

use std::rc::Rc;

use anyhow::Result;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use lyra_engine::coords::{Rect, Vec2, Viewport};
use lyra_engine::core::{App, AppControl, FrameCtx};
use lyra_engine::device::GpuInit;
use lyra_engine::filter::{Alpha, Clipper, ColorFilter, Filter, Hook};
use lyra_engine::logging::{init_logging, LoggingConfig};
use lyra_engine::paint::Color;
use lyra_engine::render::LineRenderer;
use lyra_engine::transform::{Stage, StTransform, TransformSystem};
use lyra_engine::visual::{LineVisual, VertexBuffer};
use lyra_engine::window::{Runtime, RuntimeConfig};

/// Reference region, in the clipped visual's own space, that the clip bounds
/// are re-derived from whenever the window resizes.
const CLIP_REFERENCE: Rect = Rect::new(50.0, -15.0, 250.0, 30.0);

/// Index of the visual the shared clipper tracks.
const CLIPPED_VISUAL: usize = 1;

/// Diagonal hatching, defined here rather than in the engine: periodic
/// discard bands over the framebuffer coordinate, with the surviving band
/// fading the green channel toward the gap.
struct Hatching;

impl Filter for Hatching {
    fn hook(&self) -> Hook {
        Hook::FragmentPost
    }

    fn snippet(&self) -> String {
        "let f = (coord.x * 0.4 + coord.y) % 20.0;\n\
         if (f < 5.0) {\n\
             discard;\n\
         }\n\
         color.g = color.g + 0.05 * (20.0 - f);"
            .to_string()
    }
}

struct FilterDemo {
    visuals: Vec<LineVisual>,
    systems: Vec<TransformSystem>,
    clipper: Rc<Clipper>,
    renderer: LineRenderer,
}

fn build_demo() -> Result<FilterDemo> {
    let positions = data::noisy_line(400, 350.0, 20.0);

    let translations = [
        Vec2::new(0.0, 50.0),
        Vec2::new(400.0, 50.0),
        Vec2::new(0.0, 150.0),
        Vec2::new(400.0, 150.0),
        Vec2::new(0.0, 250.0),
        Vec2::new(400.0, 250.0),
    ];

    let mut visuals: Vec<LineVisual> = translations
        .iter()
        .map(|&t| {
            let mut v = LineVisual::new(VertexBuffer::new(positions.clone()));
            v.transform = Some(StTransform::from_translate(t));
            v
        })
        .collect();

    // Clipping filter; bounds are framebuffer-space and updated on resize.
    let clipper = Rc::new(Clipper::new(Rect::new(500.0, 725.0, 200.0, 50.0))?);
    visuals[CLIPPED_VISUAL].attach(clipper.clone());

    // Opacity filter.
    visuals[2].attach(Rc::new(Alpha::new(0.4)?));

    // Color filter (for anaglyph stereo).
    let red = ColorFilter::new(Color::new(1.0, 0.0, 0.0, 1.0))?;
    visuals[3].attach(Rc::new(red));

    // A custom filter.
    visuals[4].attach(Rc::new(Hatching));

    // Mixing filters: tint, then hatch. The chain is order-dependent.
    visuals[5].attach(Rc::new(red));
    visuals[5].attach(Rc::new(Hatching));

    let systems = visuals
        .iter()
        .map(|v| {
            let mut sys = TransformSystem::new();
            sys.set_visual_to_document(v.transform.unwrap_or(StTransform::IDENTITY));
            sys
        })
        .collect();

    Ok(FilterDemo {
        visuals,
        systems,
        clipper,
        renderer: LineRenderer::new(),
    })
}

impl App for FilterDemo {
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        if let WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    physical_key: PhysicalKey::Code(KeyCode::Escape),
                    state: ElementState::Pressed,
                    ..
                },
            ..
        } = event
        {
            return AppControl::Exit;
        }
        AppControl::Continue
    }

    fn on_resize(&mut self, viewport: Viewport, scale_factor: f32) {
        for sys in &mut self.systems {
            sys.auto_configure(viewport, scale_factor);
        }

        // The clip rect lives in framebuffer space, so it goes stale with
        // the mapping; re-derive it from the reference region.
        match self.systems[CLIPPED_VISUAL].effective(Stage::Visual, Stage::Framebuffer) {
            Ok(tr) => {
                if let Err(e) = self.clipper.set_bounds(tr.map_rect(CLIP_REFERENCE)) {
                    log::warn!("clip bounds rejected after resize: {e}");
                }
            }
            Err(e) => log::warn!("cannot re-derive clip bounds: {e}"),
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let visuals = &self.visuals;
        let systems = &self.systems;
        let renderer = &mut self.renderer;

        ctx.render(Color::black(), |rctx, target| {
            for (i, (visual, system)) in visuals.iter().zip(systems).enumerate() {
                // One failing visual must not take the frame down with it.
                if let Err(e) = renderer.draw(rctx, target, visual, system) {
                    log::error!("visual {i} failed to draw: {e}");
                }
            }
        })
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let demo = build_demo()?;

    Runtime::run(
        RuntimeConfig {
            title: "lyra filters".to_string(),
            initial_size: LogicalSize::new(800.0, 800.0),
        },
        GpuInit::default(),
        demo,
    )
}
