//! WGSL shader assembly.

use std::fmt::Write as _;

/// Source of the isosurface vertex and fragment stages.
pub const ISOSURFACE_SHADER: &str = include_str!("shaders/isosurface.wgsl");

/// Builder that prepends `u32` constants to a WGSL source.
///
/// Array lengths shared between Rust and WGSL (such as the number of spheres
/// the fragment shader colors) are injected here so both sides agree.
pub struct ShaderBuilder {
    source: String,
    constants: Vec<(String, u32)>,
    label: Option<String>,
}

impl ShaderBuilder {
    /// Creates a builder for the given WGSL source.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            constants: Vec::new(),
            label: None,
        }
    }

    /// Adds `const name: u32 = value;` ahead of the source.
    #[must_use]
    pub fn with_constant(mut self, name: impl Into<String>, value: u32) -> Self {
        self.constants.push((name.into(), value));
        self
    }

    /// Sets the shader label for debugging.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Returns the final WGSL text.
    #[must_use]
    pub fn source(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.constants {
            let _ = writeln!(out, "const {name}: u32 = {value}u;");
        }
        if !self.constants.is_empty() {
            out.push('\n');
        }
        out.push_str(&self.source);
        out
    }

    /// Compiles the shader module.
    pub fn build_module(&self, device: &wgpu::Device) -> wgpu::ShaderModule {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: self.label.as_deref(),
            source: wgpu::ShaderSource::Wgsl(self.source().into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_are_prepended() {
        let source = ShaderBuilder::new("fn main() {}")
            .with_constant("MAX_SPHERES", 5)
            .with_constant("OTHER", 2)
            .source();
        assert!(source.starts_with("const MAX_SPHERES: u32 = 5u;\nconst OTHER: u32 = 2u;\n"));
        assert!(source.ends_with("fn main() {}"));
    }

    #[test]
    fn test_no_constants_is_passthrough() {
        assert_eq!(ShaderBuilder::new("x").source(), "x");
    }

    #[test]
    fn test_isosurface_shader_expects_sphere_constant() {
        assert!(ISOSURFACE_SHADER.contains("MAX_SPHERES"));
        assert!(!ISOSURFACE_SHADER.contains("const MAX_SPHERES"));
        assert!(ISOSURFACE_SHADER.contains("fn vs_main"));
        assert!(ISOSURFACE_SHADER.contains("fn fs_main"));
    }
}
