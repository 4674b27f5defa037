use std::fmt::Write as _;

use crate::coords::Vec2;
use crate::filter::Hook;
use crate::paint::Color;
use crate::transform::StTransform;

/// Collects filter snippets and assembles the final WGSL source.
///
/// Each [`add`](ShaderBuilder::add) call claims the next parameter slot;
/// slots therefore follow global attachment order across all hooks, which is
/// also the order the uniform parameter array is packed in. Adding the same
/// snippet twice produces two wrappers and two slots; duplication is the
/// caller's contract, not a builder concern.
#[derive(Debug, Default)]
pub struct ShaderBuilder {
    entries: Vec<Entry>,
}

#[derive(Debug)]
struct Entry {
    hook: Hook,
    code: String,
}

impl ShaderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a snippet at `hook` and returns its parameter slot.
    pub fn add(&mut self, hook: Hook, code: String) -> usize {
        let slot = self.entries.len();
        self.entries.push(Entry { hook, code });
        slot
    }

    #[inline]
    pub fn slot_count(&self) -> usize {
        self.entries.len()
    }

    /// Assembles the complete WGSL module for the current snippet set.
    pub fn source(&self) -> String {
        // WGSL uniform arrays need a fixed non-zero length; an empty chain
        // still declares one (unused) slot.
        let param_slots = self.entries.len().max(1);

        let mut src = String::new();

        let _ = write!(
            src,
            "struct Uniforms {{\n    \
                 transform: vec4<f32>,\n    \
                 viewport: vec4<f32>,\n    \
                 color: vec4<f32>,\n    \
                 filter_params: array<vec4<f32>, {param_slots}>,\n\
             }};\n\n\
             @group(0) @binding(0) var<uniform> u: Uniforms;\n"
        );

        for (slot, entry) in self.entries.iter().enumerate() {
            src.push('\n');
            src.push_str(&wrapper(slot, entry));
        }

        let _ = write!(
            src,
            "\n@vertex\n\
             fn vs_main(@location(0) position: vec2<f32>) -> @builtin(position) vec4<f32> {{\n    \
                 var pos = position;\n\
             {pre}    \
                 pos = pos * u.transform.xy + u.transform.zw;\n\
             {post}    \
                 let ndc = (pos / u.viewport.xy) * 2.0 - vec2<f32>(1.0, 1.0);\n    \
                 return vec4<f32>(ndc, 0.0, 1.0);\n\
             }}\n",
            pre = self.chain_calls(Hook::VertexPre),
            post = self.chain_calls(Hook::VertexPost),
        );

        let _ = write!(
            src,
            "\n@fragment\n\
             fn fs_main(@builtin(position) frag_pos: vec4<f32>) -> @location(0) vec4<f32> {{\n    \
                 let coord = vec2<f32>(frag_pos.x, u.viewport.y - frag_pos.y);\n    \
                 var color = u.color;\n\
             {pre}\
             {post}    \
                 return color;\n\
             }}\n",
            pre = self.chain_calls(Hook::FragmentPre),
            post = self.chain_calls(Hook::FragmentPost),
        );

        src
    }

    fn chain_calls(&self, hook: Hook) -> String {
        let mut out = String::new();
        for (slot, entry) in self.entries.iter().enumerate() {
            if entry.hook != hook {
                continue;
            }
            if hook.is_fragment() {
                let _ = writeln!(out, "    color = filter_{slot}(color, coord);");
            } else {
                let _ = writeln!(out, "    pos = filter_{slot}(pos);");
            }
        }
        out
    }
}

fn wrapper(slot: usize, entry: &Entry) -> String {
    let mut body = String::new();
    for line in entry.code.lines() {
        let _ = writeln!(body, "    {line}");
    }

    // `src` rather than `input`: WGSL reserves a long identifier list and the
    // generated names must stay clear of it.
    if entry.hook.is_fragment() {
        format!(
            "fn filter_{slot}(src: vec4<f32>, coord: vec2<f32>) -> vec4<f32> {{\n    \
                 let params = u.filter_params[{slot}];\n    \
                 var color = src;\n\
             {body}    \
                 return color;\n\
             }}\n"
        )
    } else {
        format!(
            "fn filter_{slot}(src: vec2<f32>) -> vec2<f32> {{\n    \
                 let params = u.filter_params[{slot}];\n    \
                 var pos = src;\n\
             {body}    \
                 return pos;\n\
             }}\n"
        )
    }
}

/// A fully assembled program for one visual: the WGSL module plus the data
/// its uniform block is packed from.
///
/// `transform` is the composed visual→framebuffer mapping. `filter_params`
/// holds one slot per attachment, in attachment order, re-collected every
/// frame so mutable filter state is current.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramSource {
    pub wgsl: String,
    pub transform: StTransform,
    pub color: Color,
    pub filter_params: Vec<[f32; 4]>,
}

impl ProgramSource {
    /// Packs the uniform block contents.
    ///
    /// Layout mirrors the generated `Uniforms` struct: transform
    /// (scale.xy, translate.zw), viewport (physical w/h, two spare lanes),
    /// color, then the parameter array padded to at least one slot. The
    /// framebuffer size is clamped to 1px to keep the shader's NDC division
    /// well-defined on degenerate surfaces.
    pub fn uniform_data(&self, framebuffer_size: Vec2) -> Vec<f32> {
        let slots = self.filter_params.len().max(1);
        let mut data = Vec::with_capacity(12 + slots * 4);

        data.extend_from_slice(&[
            self.transform.scale.x,
            self.transform.scale.y,
            self.transform.translate.x,
            self.transform.translate.y,
        ]);
        data.extend_from_slice(&[
            framebuffer_size.x.max(1.0),
            framebuffer_size.y.max(1.0),
            0.0,
            0.0,
        ]);
        data.extend_from_slice(&self.color.to_array());

        for p in &self.filter_params {
            data.extend_from_slice(p);
        }
        if self.filter_params.is_empty() {
            data.extend_from_slice(&[0.0; 4]);
        }

        data
    }
}

#[cfg(test)]
mod tests {
    use crate::filter::Filter;

    use super::*;

    struct Snip(Hook, &'static str);

    impl Filter for Snip {
        fn hook(&self) -> Hook {
            self.0
        }
        fn snippet(&self) -> String {
            self.1.to_string()
        }
    }

    fn build(filters: &[&dyn Filter]) -> String {
        let mut b = ShaderBuilder::new();
        for f in filters {
            b.add(f.hook(), f.snippet());
        }
        b.source()
    }

    // ── assembly shape ────────────────────────────────────────────────────

    #[test]
    fn empty_chain_has_entry_points_and_no_wrappers() {
        let src = build(&[]);
        assert!(src.contains("fn vs_main"));
        assert!(src.contains("fn fs_main"));
        assert!(!src.contains("fn filter_"));
        assert!(src.contains("array<vec4<f32>, 1>"));
    }

    #[test]
    fn one_wrapper_per_snippet() {
        let src = build(&[
            &Snip(Hook::FragmentPost, "color.a = color.a * params.x;"),
            &Snip(Hook::FragmentPost, "color = color * params;"),
            &Snip(Hook::VertexPre, "pos = pos + params.xy;"),
        ]);

        assert_eq!(src.matches("fn filter_").count(), 3);
        assert!(src.contains("array<vec4<f32>, 3>"));
    }

    #[test]
    fn fragment_chain_preserves_attachment_order() {
        let src = build(&[
            &Snip(Hook::FragmentPost, "color = color * params;"),
            &Snip(Hook::FragmentPost, "color.a = color.a * params.x;"),
        ]);

        let first = src.find("color = filter_0(color, coord);").unwrap();
        let second = src.find("color = filter_1(color, coord);").unwrap();
        assert!(first < second);
    }

    #[test]
    fn hooks_route_to_their_stage() {
        let src = build(&[
            &Snip(Hook::VertexPre, "pos = pos * 2.0;"),
            &Snip(Hook::FragmentPre, "color.r = 0.0;"),
        ]);

        // Vertex wrapper operates on vec2, fragment wrapper on vec4.
        assert!(src.contains("fn filter_0(src: vec2<f32>) -> vec2<f32>"));
        assert!(src.contains("fn filter_1(src: vec4<f32>, coord: vec2<f32>) -> vec4<f32>"));

        // The vertex-pre call lands before the transform line.
        let call = src.find("pos = filter_0(pos);").unwrap();
        let transform = src.find("pos = pos * u.transform.xy").unwrap();
        assert!(call < transform);
    }

    #[test]
    fn duplicate_snippets_get_distinct_slots() {
        let alpha = Snip(Hook::FragmentPost, "color.a = color.a * params.x;");
        let src = build(&[&alpha, &alpha]);

        assert!(src.contains("fn filter_0"));
        assert!(src.contains("fn filter_1"));
        assert!(src.contains("u.filter_params[0]"));
        assert!(src.contains("u.filter_params[1]"));
    }

    // ── uniform packing ───────────────────────────────────────────────────

    #[test]
    fn uniform_data_matches_declared_layout() {
        let program = ProgramSource {
            wgsl: String::new(),
            transform: StTransform::new(Vec2::new(1.0, -1.0), Vec2::new(0.0, 800.0)),
            color: Color::white(),
            filter_params: vec![[0.4, 0.0, 0.0, 0.0], [1.0, 0.0, 0.0, 1.0]],
        };

        let data = program.uniform_data(Vec2::new(800.0, 800.0));
        assert_eq!(data.len(), 12 + 2 * 4);
        assert_eq!(&data[0..4], &[1.0, -1.0, 0.0, 800.0]);
        assert_eq!(&data[4..6], &[800.0, 800.0]);
        assert_eq!(&data[8..12], &[1.0, 1.0, 1.0, 1.0]);
        assert_eq!(&data[12..16], &[0.4, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn uniform_data_pads_empty_chain_to_one_slot() {
        let program = ProgramSource {
            wgsl: String::new(),
            transform: StTransform::IDENTITY,
            color: Color::white(),
            filter_params: vec![],
        };

        assert_eq!(program.uniform_data(Vec2::new(100.0, 100.0)).len(), 16);
    }

    #[test]
    fn uniform_data_clamps_degenerate_viewport() {
        let program = ProgramSource {
            wgsl: String::new(),
            transform: StTransform::IDENTITY,
            color: Color::white(),
            filter_params: vec![],
        };

        let data = program.uniform_data(Vec2::zero());
        assert_eq!(&data[4..6], &[1.0, 1.0]);
    }
}
