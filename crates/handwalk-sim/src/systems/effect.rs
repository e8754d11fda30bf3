//! Color-ramp post-processing effect.
//!
//! The effect is plain data: a shader source, a uniform map, and a
//! per-frame update hook. The host compiles the shader and uploads the
//! uniforms; nothing here touches a graphics API.

use std::collections::BTreeMap;

use handwalk_core::state::{EffectView, UniformValue};

/// Remaps scene color through a ramp texture, keyed on the red channel.
pub const COLOR_RAMP_FRAGMENT: &str = r#"
uniform sampler2D colorRamp;

vec3 greyscale(vec3 color, float strength) {
    float g = dot(color, vec3(0.299, 0.587, 0.114));
    return mix(color, vec3(g), strength);
}

vec3 greyscale(vec3 color) {
    return greyscale(color, 1.0);
}

void mainImage(const in vec4 inputColor, const in vec2 uv, out vec4 outputColor) {
    vec4 c = texture2D(inputBuffer, uv);
    vec4 targetC = texture2D(colorRamp, vec2(c.r, max(c.b, c.g)));
    outputColor = mix(targetC, c, c.r);
}
"#;

pub const COLOR_RAMP_TEXTURE: &str = "/ramp.jpg";

type UpdateHook = fn(&mut BTreeMap<String, UniformValue>, f64);

/// A composed post-processing effect.
#[derive(Clone)]
pub struct Effect {
    pub name: String,
    pub fragment_shader: &'static str,
    uniforms: BTreeMap<String, UniformValue>,
    on_update: UpdateHook,
}

impl Effect {
    pub fn new(
        name: impl Into<String>,
        fragment_shader: &'static str,
        uniforms: BTreeMap<String, UniformValue>,
        on_update: UpdateHook,
    ) -> Self {
        Self {
            name: name.into(),
            fragment_shader,
            uniforms,
            on_update,
        }
    }

    /// Per-frame hook.
    pub fn update(&mut self, progress: f64) {
        (self.on_update)(&mut self.uniforms, progress);
    }

    pub fn uniform(&self, name: &str) -> Option<&UniformValue> {
        self.uniforms.get(name)
    }

    pub fn set_uniform(&mut self, name: impl Into<String>, value: UniformValue) {
        self.uniforms.insert(name.into(), value);
    }

    pub fn view(&self) -> EffectView {
        EffectView {
            name: self.name.clone(),
            uniforms: self.uniforms.clone(),
        }
    }
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Effect")
            .field("name", &self.name)
            .field("uniforms", &self.uniforms)
            .finish_non_exhaustive()
    }
}

/// Build the color-ramp effect with its default uniforms.
pub fn color_ramp_effect() -> Effect {
    let mut uniforms = BTreeMap::new();
    uniforms.insert("param".to_string(), UniformValue::Float(0.1));
    uniforms.insert(
        "colorRamp".to_string(),
        UniformValue::Texture(COLOR_RAMP_TEXTURE.to_string()),
    );
    uniforms.insert("progress".to_string(), UniformValue::Float(0.0));

    Effect::new(
        "ColorRampEffect",
        COLOR_RAMP_FRAGMENT,
        uniforms,
        |uniforms, progress| {
            uniforms.insert("progress".to_string(), UniformValue::Float(progress as f32));
        },
    )
}
