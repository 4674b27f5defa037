use std::rc::Rc;

use crate::filter::Filter;
use crate::paint::Color;
use crate::shader::{ProgramSource, ShaderBuilder};
use crate::transform::{StTransform, TransformSystem};

use super::{VertexBuffer, VisualError, VisualId};

/// A polyline visual: a vertex buffer drawn as a connected strip.
///
/// Owns its geometry and color, carries an assignable local transform
/// (visual → document space), and an ordered list of attached filters.
/// Attachment order is application order; it is significant because filter
/// effects chain, and non-commuting chains (discard vs. color writes) depend
/// on it.
pub struct LineVisual {
    id: VisualId,
    vertices: VertexBuffer,
    color: Color,

    /// Local transform, visual → document space. Drawing fails with
    /// [`VisualError::MissingTransform`] while this is `None`.
    pub transform: Option<StTransform>,

    filters: Vec<Rc<dyn Filter>>,
}

impl LineVisual {
    /// Creates a line visual over `vertices`, drawn white until recolored.
    pub fn new(vertices: VertexBuffer) -> Self {
        Self {
            id: VisualId::next(),
            vertices,
            color: Color::white(),
            transform: None,
            filters: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> VisualId {
        self.id
    }

    #[inline]
    pub fn vertices(&self) -> &VertexBuffer {
        &self.vertices
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Appends a filter to the chain.
    ///
    /// Attaching the same instance again is allowed and applies its effect
    /// again: two attachments of one `Alpha(0.4)` multiply alpha by 0.16.
    /// Nothing deduplicates; rebuild the visual if a chain must change.
    pub fn attach(&mut self, filter: Rc<dyn Filter>) {
        self.filters.push(filter);
    }

    #[inline]
    pub fn filters(&self) -> &[Rc<dyn Filter>] {
        &self.filters
    }

    /// Assembles this visual's shader program against the given stage chain.
    ///
    /// The composed transform is `document_to_framebuffer * local`, with the
    /// local transform taken from the visual itself. Filter parameters are
    /// collected fresh, so interior-mutable filter state (clip bounds) is
    /// current as of this call.
    pub fn assemble(&self, system: &TransformSystem) -> Result<ProgramSource, VisualError> {
        let local = self.transform.ok_or(VisualError::MissingTransform)?;
        let transform = system.document_to_framebuffer() * local;

        let mut builder = ShaderBuilder::new();
        for filter in &self.filters {
            builder.add(filter.hook(), filter.snippet());
        }

        Ok(ProgramSource {
            wgsl: builder.source(),
            transform,
            color: self.color,
            filter_params: self.filters.iter().map(|f| f.params()).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::coords::{Rect, Vec2, Viewport};
    use crate::filter::{Alpha, Clipper, ColorFilter, Hook};

    use super::*;

    fn vb(n: usize) -> VertexBuffer {
        VertexBuffer::new((0..n).map(|i| Vec2::new(i as f32, 0.0)).collect())
    }

    fn system_800() -> TransformSystem {
        let mut sys = TransformSystem::new();
        sys.auto_configure(Viewport::new(800.0, 800.0), 1.0);
        sys
    }

    // ── assemble ──────────────────────────────────────────────────────────

    #[test]
    fn assemble_without_transform_fails() {
        let visual = LineVisual::new(vb(4));
        assert_eq!(
            visual.assemble(&system_800()).unwrap_err(),
            VisualError::MissingTransform
        );
    }

    #[test]
    fn assemble_composes_local_with_document_stage() {
        let mut visual = LineVisual::new(vb(4));
        visual.transform = Some(StTransform::from_translate(Vec2::new(400.0, 50.0)));

        let program = visual.assemble(&system_800()).unwrap();

        // Visual origin → document (400, 50) → framebuffer (400, 750).
        assert_eq!(program.transform.map(Vec2::zero()), Vec2::new(400.0, 750.0));
    }

    #[test]
    fn assemble_injects_one_wrapper_per_attachment_in_order() {
        let mut visual = LineVisual::new(vb(4));
        visual.transform = Some(StTransform::IDENTITY);

        visual.attach(Rc::new(ColorFilter::new(Color::new(1.0, 0.0, 0.0, 1.0)).unwrap()));
        visual.attach(Rc::new(Alpha::new(0.4).unwrap()));

        let program = visual.assemble(&system_800()).unwrap();

        assert_eq!(program.wgsl.matches("fn filter_").count(), 2);
        let tint = program.wgsl.find("color = filter_0(color, coord);").unwrap();
        let alpha = program.wgsl.find("color = filter_1(color, coord);").unwrap();
        assert!(tint < alpha);

        assert_eq!(
            program.filter_params,
            vec![[1.0, 0.0, 0.0, 1.0], [0.4, 0.0, 0.0, 0.0]]
        );
    }

    #[test]
    fn reattaching_one_instance_doubles_its_effect() {
        let mut visual = LineVisual::new(vb(4));
        visual.transform = Some(StTransform::IDENTITY);

        let alpha: Rc<Alpha> = Rc::new(Alpha::new(0.4).unwrap());
        visual.attach(alpha.clone());
        visual.attach(alpha);

        let program = visual.assemble(&system_800()).unwrap();

        // Two wrappers, two parameter slots: the chain multiplies alpha by
        // 0.4 twice (net 0.16).
        assert_eq!(program.wgsl.matches("fn filter_").count(), 2);
        assert_eq!(
            program.filter_params,
            vec![[0.4, 0.0, 0.0, 0.0], [0.4, 0.0, 0.0, 0.0]]
        );
    }

    #[test]
    fn shared_filter_reflects_mutation_in_every_assembly() {
        let clipper = Rc::new(Clipper::new(Rect::new(500.0, 725.0, 200.0, 50.0)).unwrap());

        let mut a = LineVisual::new(vb(4));
        let mut b = LineVisual::new(vb(4));
        a.transform = Some(StTransform::IDENTITY);
        b.transform = Some(StTransform::IDENTITY);
        a.attach(clipper.clone());
        b.attach(clipper.clone());

        clipper.set_bounds(Rect::new(450.0, 335.0, 250.0, 30.0)).unwrap();

        let sys = system_800();
        for visual in [&a, &b] {
            let program = visual.assemble(&sys).unwrap();
            assert_eq!(program.filter_params, vec![[450.0, 335.0, 250.0, 30.0]]);
        }
    }

    #[test]
    fn custom_filters_extend_the_chain_without_engine_changes() {
        struct Hatching;

        impl crate::filter::Filter for Hatching {
            fn hook(&self) -> Hook {
                Hook::FragmentPost
            }
            fn snippet(&self) -> String {
                "let f = (coord.x * 0.4 + coord.y) % 20.0;\n\
                 if (f < 5.0) {\n    discard;\n}\n\
                 color.g = color.g + 0.05 * (20.0 - f);"
                    .to_string()
            }
        }

        let mut visual = LineVisual::new(vb(4));
        visual.transform = Some(StTransform::IDENTITY);
        visual.attach(Rc::new(Hatching));

        let program = visual.assemble(&system_800()).unwrap();
        assert!(program.wgsl.contains("discard"));
        assert!(program.wgsl.contains("% 20.0"));
    }

    // ── identity ──────────────────────────────────────────────────────────

    #[test]
    fn visuals_get_distinct_ids() {
        assert_ne!(LineVisual::new(vb(1)).id(), LineVisual::new(vb(1)).id());
    }
}
