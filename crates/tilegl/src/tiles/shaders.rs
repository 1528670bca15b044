//! GLSL sources for the tile bank. All uniform blocks are std140 at set 0,
//! binding 0, mirrored in `uniforms.rs`.

/// Full-viewport quad vertex stage shared by every field pass.
pub const QUAD_VS: &str = r"#version 450
layout(location = 0) in vec2 a_position;
layout(location = 1) in vec2 a_texcoord;
layout(location = 0) out vec2 v_texcoord;

void main() {
    v_texcoord = a_texcoord;
    gl_Position = vec4(a_position, 0.0, 1.0);
}
";

/// Vertex stage for the emblem shapes; passes clip-space position through
/// for the gradient projection.
pub const SHAPE_VS: &str = r"#version 450
layout(location = 0) in vec2 a_position;
layout(location = 0) out vec2 v_position;

void main() {
    v_position = a_position;
    gl_Position = vec4(a_position, 0.0, 1.0);
}
";

pub const LINE_VS: &str = r"#version 450
layout(location = 0) in vec2 a_position;

void main() {
    gl_Position = vec4(a_position, 0.0, 1.0);
}
";

/// Static film grain over a flat base color.
pub const GRAIN_FS: &str = r"#version 450
layout(location = 0) in vec2 v_texcoord;
layout(location = 0) out vec4 out_color;

layout(std140, set = 0, binding = 0) uniform GrainParams {
    vec4 base_seed;
    vec4 grain;
} params;

float grain_noise(vec2 st) {
    return fract(sin(dot(st + vec2(params.base_seed.w), vec2(12.9898, 78.233))) * 43758.5453123);
}

void main() {
    vec3 base = params.base_seed.rgb;
    float noise = grain_noise(v_texcoord * 500.0);
    float amount = params.grain.x;
    vec3 color = base * (1.0 - amount) + vec3(noise) * amount;
    out_color = vec4(color, 1.0);
}
";

/// Grain plus a bounded corner tint with squared falloff. The corner index
/// mirrors the texcoords so one program serves all four corners.
pub const CORNER_FS: &str = r"#version 450
layout(location = 0) in vec2 v_texcoord;
layout(location = 0) out vec4 out_color;

layout(std140, set = 0, binding = 0) uniform CornerParams {
    vec4 base_seed;
    vec4 tint;
    vec4 extent;
} params;

float grain_noise(vec2 st) {
    return fract(sin(dot(st + vec2(params.base_seed.w), vec2(12.9898, 78.233))) * 43758.5453123);
}

void main() {
    float noise = grain_noise(v_texcoord * 500.0);
    float amount = params.extent.z;
    vec3 noisy = params.base_seed.rgb * (1.0 - amount) + vec3(noise) * amount;

    vec2 uv = v_texcoord;
    float corner = params.extent.w;
    if (corner == 1.0) {
        uv.x = 1.0 - uv.x;
    } else if (corner == 2.0) {
        uv.y = 1.0 - uv.y;
    } else if (corner == 3.0) {
        uv = vec2(1.0) - uv;
    }

    vec2 normalized = uv / params.extent.xy;
    float dist = clamp(length(normalized) / sqrt(2.0), 0.0, 1.0);
    float strength = pow(1.0 - dist, 2.0);
    if (uv.x > params.extent.x || uv.y > params.extent.y) {
        strength = 0.0;
    }

    vec3 color = mix(noisy, params.tint.rgb, strength * params.tint.w);
    out_color = vec4(color, 1.0);
}
";

/// Three point lights with inverse-square-like falloff, grain-blended.
pub const LIGHTS_FS: &str = r"#version 450
layout(location = 0) in vec2 v_texcoord;
layout(location = 0) out vec4 out_color;

layout(std140, set = 0, binding = 0) uniform LightParams {
    vec4 positions[3];
    vec4 colors[3];
    vec4 seed_grain;
} params;

float grain_noise(vec2 st) {
    return fract(sin(dot(st + vec2(params.seed_grain.x), vec2(12.9898, 78.233))) * 43758.5453123);
}

void main() {
    vec3 total = vec3(0.0);
    for (int i = 0; i < 3; i++) {
        float dist = distance(v_texcoord, params.positions[i].xy);
        float falloff = 1.0 / (1.0 + 5.0 * dist * dist);
        total += params.colors[i].rgb * falloff * params.colors[i].w;
    }

    float noise = grain_noise(v_texcoord * 500.0);
    float amount = params.seed_grain.y;
    vec3 color = total * (1.0 - amount) + vec3(noise) * amount;
    out_color = vec4(color, 1.0);
}
";

/// Per-shape linear gradient: clamped projection of the fragment onto the
/// shape's gradient axis.
pub const SHAPE_FS: &str = r"#version 450
layout(location = 0) in vec2 v_position;
layout(location = 0) out vec4 out_color;

layout(std140, set = 0, binding = 0) uniform ShapeParams {
    vec4 axis;
    vec4 start_color;
    vec4 end_color;
} params;

void main() {
    vec2 dir = params.axis.zw - params.axis.xy;
    float len2 = dot(dir, dir);
    float t = 0.0;
    if (len2 > 0.0) {
        t = clamp(dot(v_position - params.axis.xy, dir) / len2, 0.0, 1.0);
    }
    vec3 color = mix(params.start_color.rgb, params.end_color.rgb, t);
    out_color = vec4(color, 1.0);
}
";

pub const LINE_FS: &str = r"#version 450
layout(location = 0) out vec4 out_color;

layout(std140, set = 0, binding = 0) uniform LineParams {
    vec4 color;
} params;

void main() {
    out_color = vec4(params.color.rgb, 1.0);
}
";

/// Eased base gradient plus up to sixteen cubic bezier strokes rendered as
/// sampled distance fields and combined by maximum influence.
pub const CURVES_FS: &str = r"#version 450
layout(location = 0) in vec2 v_texcoord;
layout(location = 0) out vec4 out_color;

layout(std140, set = 0, binding = 0) uniform CurveParams {
    vec4 base_seed;
    vec4 curve_style;
    vec4 gradient_coords;
    vec4 gradient_start_color;
    vec4 gradient_end_color;
    vec4 counts;
    vec4 control_points[32];
} params;

float grain_noise(vec2 st) {
    return fract(sin(dot(st + vec2(params.base_seed.w), vec2(12.9898, 78.233))) * 43758.5453123);
}

float curve_influence(int index, vec2 p, float thickness) {
    vec4 head = params.control_points[index * 2];
    vec4 tail = params.control_points[index * 2 + 1];
    vec2 p0 = head.xy;
    vec2 p1 = head.zw;
    vec2 p2 = tail.xy;
    vec2 p3 = tail.zw;

    float min_dist = 1.0;
    for (int i = 0; i <= 30; i++) {
        float t = float(i) / 30.0;
        float mt = 1.0 - t;
        vec2 bp = mt * mt * mt * p0
            + 3.0 * mt * mt * t * p1
            + 3.0 * mt * t * t * p2
            + t * t * t * p3;
        min_dist = min(min_dist, length(p - bp));
    }

    if (min_dist < thickness) {
        return 1.0 - smoothstep(thickness * 0.7, thickness, min_dist);
    }
    return 0.0;
}

float gradient_factor(vec2 point, vec2 start_coord, vec2 end_coord) {
    vec2 grad = start_coord - end_coord;
    vec2 rel = point - end_coord;
    float projection = dot(rel, grad) / dot(grad, grad);
    return clamp(projection, 0.0, 1.0);
}

void main() {
    float noise = grain_noise(v_texcoord * 500.0);

    float factor = gradient_factor(v_texcoord, params.gradient_coords.xy, params.gradient_coords.zw);
    vec3 gradient = mix(params.gradient_end_color.rgb, params.gradient_start_color.rgb, factor);
    vec3 base = params.base_seed.rgb;
    if (params.gradient_end_color.w > 0.5) {
        base = mix(base, gradient, params.gradient_start_color.w);
    }

    float amount = params.counts.y;
    vec3 color = base * (1.0 - amount) + vec3(noise) * amount;

    float influence = 0.0;
    int active = int(params.counts.x);
    for (int i = 0; i < 16; i++) {
        if (i >= active) {
            break;
        }
        influence = max(influence, curve_influence(i, v_texcoord, params.curve_style.w));
    }

    color = mix(color, params.curve_style.rgb, influence);
    out_color = vec4(color, 1.0);
}
";

/// Circle markers as pixel-space smoothed discs over an ease-in-out
/// gradient; the explicit resolution uniform keeps radii resolution
/// independent.
pub const CIRCLES_FS: &str = r"#version 450
layout(location = 0) in vec2 v_texcoord;
layout(location = 0) out vec4 out_color;

layout(std140, set = 0, binding = 0) uniform CircleParams {
    vec4 seed_counts;
    vec4 resolution;
    vec4 gradient_coords;
    vec4 gradient_start_color;
    vec4 gradient_end_color;
    vec4 circle_color;
    vec4 centers[10];
} params;

float grain_noise(vec2 st) {
    return fract(sin(dot(st + vec2(params.seed_counts.x), vec2(12.9898, 78.233))) * 43758.5453123);
}

void main() {
    float radius = params.seed_counts.y;
    int count = int(params.seed_counts.z);
    vec2 pixel = v_texcoord * params.resolution.xy;

    float min_edge = 1.0;
    for (int i = 0; i < 10; i++) {
        if (i >= count) {
            break;
        }
        vec2 center = params.centers[i].xy * params.resolution.xy;
        float dist = distance(pixel, center);
        float edge = smoothstep(radius - 0.5, radius + 0.5, dist);
        min_edge = min(min_edge, edge);
    }

    vec2 grad = params.gradient_coords.zw - params.gradient_coords.xy;
    float len = length(grad);
    vec2 norm = grad / len;
    float projection = dot(v_texcoord - params.gradient_coords.xy, norm);
    float pos = clamp(projection / len, 0.0, 1.0);
    if (pos < 0.5) {
        pos = 2.0 * pos * pos;
    } else {
        pos = 1.0 - pow(-2.0 * pos + 2.0, 2.0) / 2.0;
    }
    vec3 gradient = mix(params.gradient_start_color.rgb, params.gradient_end_color.rgb, pos);

    float noise = grain_noise(v_texcoord * 500.0);
    vec3 base = mix(gradient, params.circle_color.rgb, 1.0 - min_edge);
    float amount = params.seed_counts.w;
    vec3 color = base * (1.0 - amount) + vec3(noise) * amount;
    out_color = vec4(color, 1.0);
}
";
