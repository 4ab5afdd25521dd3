use glow::HasContext;
use glutin::{
    dpi::LogicalSize,
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
    Api, ContextBuilder, GlProfile, GlRequest,
};
use nalgebra::{Matrix4, Point3, Vector3};
use std::{env, error::Error, mem, time::Instant};
use thin_glow::Device;

const VERTEX_SOURCE: &str = r#"#version 150 core
in vec3 position;
in vec3 color;
in vec2 texcoord;
out vec3 Color;
out vec2 Texcoord;
uniform mat4 model;
uniform mat4 view;
uniform mat4 proj;
uniform vec3 overrideColor;
void main()
{
    Color = overrideColor * color;
    Texcoord = texcoord;
    gl_Position = proj * view * model * vec4(position, 1.0);
}
"#;

const FRAGMENT_SOURCE: &str = r#"#version 150 core
in vec3 Color;
in vec2 Texcoord;
out vec4 outColor;
uniform sampler2D tex;
void main()
{
    outColor = vec4(Color, 1.0) * texture(tex, Texcoord);
}
"#;

#[derive(Debug, Clone, Copy)]
#[repr(C)]
struct Vertex {
    position: [f32; 3],
    color: [f32; 3],
    uv: [f32; 2],
}

/// Cube faces followed by the floor quad, two triangles each.
/// Position, color, texture coordinates.
#[rustfmt::skip]
const SCENE: [[f32; 8]; 42] = [
    [-0.5, -0.5, -0.5, 1.0, 1.0, 1.0, 0.0, 0.0],
    [ 0.5, -0.5, -0.5, 1.0, 1.0, 1.0, 1.0, 0.0],
    [ 0.5,  0.5, -0.5, 1.0, 1.0, 1.0, 1.0, 1.0],
    [ 0.5,  0.5, -0.5, 1.0, 1.0, 1.0, 1.0, 1.0],
    [-0.5,  0.5, -0.5, 1.0, 1.0, 1.0, 0.0, 1.0],
    [-0.5, -0.5, -0.5, 1.0, 1.0, 1.0, 0.0, 0.0],

    [-0.5, -0.5,  0.5, 1.0, 1.0, 1.0, 0.0, 0.0],
    [ 0.5, -0.5,  0.5, 1.0, 1.0, 1.0, 1.0, 0.0],
    [ 0.5,  0.5,  0.5, 1.0, 1.0, 1.0, 1.0, 1.0],
    [ 0.5,  0.5,  0.5, 1.0, 1.0, 1.0, 1.0, 1.0],
    [-0.5,  0.5,  0.5, 1.0, 1.0, 1.0, 0.0, 1.0],
    [-0.5, -0.5,  0.5, 1.0, 1.0, 1.0, 0.0, 0.0],

    [-0.5,  0.5,  0.5, 1.0, 1.0, 1.0, 1.0, 0.0],
    [-0.5,  0.5, -0.5, 1.0, 1.0, 1.0, 1.0, 1.0],
    [-0.5, -0.5, -0.5, 1.0, 1.0, 1.0, 0.0, 1.0],
    [-0.5, -0.5, -0.5, 1.0, 1.0, 1.0, 0.0, 1.0],
    [-0.5, -0.5,  0.5, 1.0, 1.0, 1.0, 0.0, 0.0],
    [-0.5,  0.5,  0.5, 1.0, 1.0, 1.0, 1.0, 0.0],

    [ 0.5,  0.5,  0.5, 1.0, 1.0, 1.0, 1.0, 0.0],
    [ 0.5,  0.5, -0.5, 1.0, 1.0, 1.0, 1.0, 1.0],
    [ 0.5, -0.5, -0.5, 1.0, 1.0, 1.0, 0.0, 1.0],
    [ 0.5, -0.5, -0.5, 1.0, 1.0, 1.0, 0.0, 1.0],
    [ 0.5, -0.5,  0.5, 1.0, 1.0, 1.0, 0.0, 0.0],
    [ 0.5,  0.5,  0.5, 1.0, 1.0, 1.0, 1.0, 0.0],

    [-0.5, -0.5, -0.5, 1.0, 1.0, 1.0, 0.0, 1.0],
    [ 0.5, -0.5, -0.5, 1.0, 1.0, 1.0, 1.0, 1.0],
    [ 0.5, -0.5,  0.5, 1.0, 1.0, 1.0, 1.0, 0.0],
    [ 0.5, -0.5,  0.5, 1.0, 1.0, 1.0, 1.0, 0.0],
    [-0.5, -0.5,  0.5, 1.0, 1.0, 1.0, 0.0, 0.0],
    [-0.5, -0.5, -0.5, 1.0, 1.0, 1.0, 0.0, 1.0],

    [-0.5,  0.5, -0.5, 1.0, 1.0, 1.0, 0.0, 1.0],
    [ 0.5,  0.5, -0.5, 1.0, 1.0, 1.0, 1.0, 1.0],
    [ 0.5,  0.5,  0.5, 1.0, 1.0, 1.0, 1.0, 0.0],
    [ 0.5,  0.5,  0.5, 1.0, 1.0, 1.0, 1.0, 0.0],
    [-0.5,  0.5,  0.5, 1.0, 1.0, 1.0, 0.0, 0.0],
    [-0.5,  0.5, -0.5, 1.0, 1.0, 1.0, 0.0, 1.0],

    [-1.0, -1.0, -0.5, 0.0, 0.0, 0.0, 0.0, 0.0],
    [ 1.0, -1.0, -0.5, 0.0, 0.0, 0.0, 1.0, 0.0],
    [ 1.0,  1.0, -0.5, 0.0, 0.0, 0.0, 1.0, 1.0],
    [ 1.0,  1.0, -0.5, 0.0, 0.0, 0.0, 1.0, 1.0],
    [-1.0,  1.0, -0.5, 0.0, 0.0, 0.0, 0.0, 1.0],
    [-1.0, -1.0, -0.5, 0.0, 0.0, 0.0, 0.0, 0.0],
];

/// Loads the image at `path`, or a checkerboard when no path is given.
fn load_image(path: Option<String>) -> Result<image::RgbaImage, Box<dyn Error>> {
    match path {
        Some(path) => Ok(image::open(path)?.into_rgba8()),
        None => Ok(image::RgbaImage::from_fn(64, 64, |x, y| {
            if (x / 8 + y / 8) % 2 == 0 {
                image::Rgba([255, 255, 255, 255])
            } else {
                image::Rgba([64, 96, 192, 255])
            }
        })),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Create OpenGL context from window.
    let (mut device, event_loop, windowed_context) = {
        let el = EventLoop::new();
        let wb = WindowBuilder::new()
            .with_title("Thin")
            .with_inner_size(LogicalSize::new(800.0, 480.0));
        let windowed_context = ContextBuilder::new()
            .with_vsync(true)
            .with_gl(GlRequest::Specific(Api::OpenGl, (3, 2)))
            .with_gl_profile(GlProfile::Core)
            .with_depth_buffer(24)
            .with_stencil_buffer(8)
            .with_multisampling(4)
            .build_windowed(wb, &el)?;
        let windowed_context =
            unsafe { windowed_context.make_current().map_err(|(_, err)| err)? };
        let device = unsafe { Device::from_windowed_context(&windowed_context) };
        (device, el, windowed_context)
    };

    device.initialize();
    device.set_error_callback(|err| log::error!("{}", err));
    log::info!("debug markers: {}", device.has_debug_markers());

    device.enable(glow::DEPTH_TEST);

    // Vertex array and buffer.
    let vao = device.gen_vertex_array();
    device.bind_vertex_array(vao);

    let vertices: Vec<Vertex> = SCENE
        .iter()
        .map(|v| Vertex {
            position: [v[0], v[1], v[2]],
            color: [v[3], v[4], v[5]],
            uv: [v[6], v[7]],
        })
        .collect();

    let vbo = device.gen_buffer();
    device.bind_buffer(glow::ARRAY_BUFFER, vbo);
    device.buffer_data(glow::ARRAY_BUFFER, &vertices, glow::STATIC_DRAW);

    // Shader program.
    let program = device.create_program(VERTEX_SOURCE, None, FRAGMENT_SOURCE);
    device.use_program(program);

    // Vertex layout is interleaved.
    let stride = mem::size_of::<Vertex>() as i32;
    let attributes = [
        ("position", 3, memoffset::offset_of!(Vertex, position)),
        ("color", 3, memoffset::offset_of!(Vertex, color)),
        ("texcoord", 2, memoffset::offset_of!(Vertex, uv)),
    ];
    for (name, size, offset) in attributes.iter() {
        let location = device.get_attrib_location(program, name);
        device.enable_vertex_attrib_array_pointer(
            location,
            *size,
            glow::FLOAT,
            false,
            stride,
            *offset as i32,
        );
    }

    // Texture.
    let img = load_image(env::args().nth(1))?;
    let max_size = unsafe {
        device
            .native()
            .glow()
            .get_parameter_i32(glow::MAX_TEXTURE_SIZE)
    };
    if img.width().max(img.height()) as i32 > max_size {
        log::warn!(
            "texture {}x{} exceeds the maximum size {}",
            img.width(),
            img.height(),
            max_size
        );
    }
    let texture = device.gen_texture();
    device.bind_active_texture(glow::TEXTURE0, glow::TEXTURE_2D, texture);
    device.tex_image_2d(
        glow::TEXTURE_2D,
        0,                   // Mip level
        glow::RGBA as i32,   // Internal colour format
        img.width() as i32,  // Width in pixels
        img.height() as i32, // Height in pixels
        glow::RGBA,          // Format
        glow::UNSIGNED_BYTE, // Color data type
        Some(img.as_raw()),
    );
    for (parameter, value) in [
        (glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE),
        (glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE),
        (glow::TEXTURE_MIN_FILTER, glow::LINEAR),
        (glow::TEXTURE_MAG_FILTER, glow::LINEAR),
    ]
    .iter()
    {
        device.tex_parameter_i32(glow::TEXTURE_2D, *parameter, *value as i32);
    }
    device.uniform_1_i32(device.get_uniform_location(program, "tex"), 0);

    // Camera.
    let uni_model = device.get_uniform_location(program, "model");
    let uni_view = device.get_uniform_location(program, "view");
    let uni_proj = device.get_uniform_location(program, "proj");
    let uni_color = device.get_uniform_location(program, "overrideColor");

    let view: Matrix4<f32> = Matrix4::look_at_rh(
        &Point3::new(2.5, 2.5, 2.0),
        &Point3::origin(),
        &Vector3::z(),
    );
    device.uniform_matrix_4_f32(uni_view, false, view.as_slice());

    let proj: Matrix4<f32> =
        Matrix4::new_perspective(800.0 / 480.0, 45f32.to_radians(), 1.0, 10.0);
    device.uniform_matrix_4_f32(uni_proj, false, proj.as_slice());
    device.uniform_3_f32(uni_color, 1.0, 1.0, 1.0);

    let start = Instant::now();

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;
        match event {
            Event::MainEventsCleared => {
                windowed_context.window().request_redraw();
            }
            Event::RedrawRequested(_) => {
                device.clear_color(1.0, 1.0, 1.0, 1.0);
                device.clear_buffers(true, true, false);

                let time = start.elapsed().as_secs_f32() * 0.125;
                let model =
                    Matrix4::from_axis_angle(&Vector3::z_axis(), time * 180f32.to_radians());
                device.uniform_matrix_4_f32(uni_model, false, model.as_slice());

                device.push_group_marker("Cube");
                device.draw_arrays(glow::TRIANGLES, 0, 36);
                device.pop_group_marker();

                // Floor writes the stencil mask for the reflection.
                device.enable(glow::STENCIL_TEST);
                device.push_group_marker("Floor");
                device.stencil_func(glow::ALWAYS, 1, 0xff);
                device.stencil_op(glow::KEEP, glow::KEEP, glow::REPLACE);
                device.stencil_mask(0xff);
                device.depth_mask(false);
                device.clear_stencil_buffer();
                device.draw_arrays(glow::TRIANGLES, 36, 6);
                device.pop_group_marker();

                // Reflection only where the floor was drawn.
                device.push_group_marker("Reflection");
                device.stencil_func(glow::EQUAL, 1, 0xff);
                device.stencil_mask(0x00);
                device.depth_mask(true);

                let reflected = model
                    * Matrix4::new_translation(&Vector3::new(0.0, 0.0, -1.0))
                    * Matrix4::new_nonuniform_scaling(&Vector3::new(1.0, 1.0, -1.0));
                device.uniform_matrix_4_f32(uni_model, false, reflected.as_slice());
                device.uniform_3_f32(uni_color, 0.3, 0.3, 0.3);
                device.draw_arrays(glow::TRIANGLES, 0, 36);
                device.uniform_3_f32(uni_color, 1.0, 1.0, 1.0);
                device.pop_group_marker();

                device.disable(glow::STENCIL_TEST);

                if let Err(err) = windowed_context.swap_buffers() {
                    log::error!("swap buffers: {}", err);
                }
            }
            Event::WindowEvent { ref event, .. } => match event {
                WindowEvent::Resized(physical_size) => {
                    windowed_context.resize(*physical_size);
                    device.viewport(
                        0,
                        0,
                        physical_size.width as i32,
                        physical_size.height as i32,
                    );
                }
                WindowEvent::CloseRequested => {
                    device.delete_texture(texture);
                    device.delete_program(program);
                    device.delete_buffer(vbo);
                    device.delete_vertex_array(vao);
                    *control_flow = ControlFlow::Exit
                }
                _ => (),
            },
            _ => (),
        }
    });
}
