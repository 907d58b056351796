use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use spanrast::prelude::*;
use spanrast::render::{FillStyle, ScreenTriangle, SpanRasterizer, TriangleShape};

const NEAR: u32 = 0xFF11_2233;
const FAR: u32 = 0xFF44_5566;

fn quad(vertices: &mut Vec<Vertex>, faces: &mut Vec<Face>, z: f32, u: f32) {
    let base = vertices.len() as u32;
    for (x, y) in [(-1.0, 1.0), (1.0, 1.0), (1.0, -1.0), (-1.0, -1.0)] {
        vertices.push(Vertex::new(Vec3::new(x, y, z), Vec2::new(u, 0.5)));
    }
    faces.push(Face::new(base, base + 1, base + 2));
    faces.push(Face::new(base, base + 2, base + 3));
}

/// Two stacked quads, the near one listed first so that drawing in mesh
/// order would leave the far one on top.
fn stacked_quads() -> Mesh {
    let mut vertices = Vec::new();
    let mut faces = Vec::new();
    quad(&mut vertices, &mut faces, 0.0, 0.25);
    quad(&mut vertices, &mut faces, 1.0, 0.75);
    Mesh::new("stacked", vertices, faces).unwrap()
}

fn two_texel_bank() -> (TextureBank, TextureId) {
    let mut bank = TextureBank::new();
    let id = bank.add(Texture::from_pixels(2, 1, vec![NEAR, FAR]).unwrap());
    (bank, id)
}

#[test]
fn nearer_faces_are_painted_last() {
    let mut renderer = Renderer::new(RendererConfig::with_screen(64, 48));
    let (bank, id) = two_texel_bank();
    let mut objects = vec![Object::new("stacked", stacked_quads()).with_texture(id)];
    let mut surface = Surface::new(64, 48, BACKGROUND_COLOR);

    renderer.translate(Vec3::new(0.0, 0.0, 3.0));
    let stats = renderer.render_scene(&mut objects, &bank, &mut surface.frame_buffer());

    assert_eq!(stats.visible, 4);
    assert_eq!(stats.drawn, 4);
    let fb = surface.frame_buffer();
    assert_eq!(fb.get_pixel(32, 24), Some(NEAR));
    assert_eq!(fb.get_pixel(0, 0), Some(BACKGROUND_COLOR));
    assert!(!surface.pixels().contains(&FAR));
}

#[test]
fn far_quad_shows_around_a_smaller_near_one() {
    let mut renderer = Renderer::new(RendererConfig::with_screen(64, 48));
    let (bank, id) = two_texel_bank();
    let mut near = Object::new("near", Mesh::plane()).with_texture(id);
    near.mesh_mut()
        .vertices_mut()
        .iter_mut()
        .for_each(|v| v.uv = Vec2::new(0.25, 0.5));
    let mut far = Object::new("far", Mesh::plane())
        .with_texture(id)
        .at(Vec3::new(0.0, 0.0, 6.0));
    far.mesh_mut()
        .vertices_mut()
        .iter_mut()
        .for_each(|v| {
            v.local = Vec3::new(v.local.x * 8.0, v.local.y * 8.0, v.local.z);
            v.uv = Vec2::new(0.75, 0.5);
        });

    // Objects are drawn in the order given; the caller orders them.
    let mut objects = vec![far, near];
    let mut surface = Surface::new(64, 48, BACKGROUND_COLOR);
    renderer.translate(Vec3::new(0.0, 0.0, 3.0));
    renderer.render_scene(&mut objects, &bank, &mut surface.frame_buffer());

    let fb = surface.frame_buffer();
    assert_eq!(fb.get_pixel(32, 24), Some(NEAR));
    assert_eq!(fb.get_pixel(8, 24), Some(FAR));
}

#[test]
fn wireframe_only_leaves_interiors_untouched() {
    let mut config = RendererConfig::with_screen(64, 48);
    config.render_mode = RenderMode::WIREFRAME;
    let mut renderer = Renderer::new(config);
    let mut objects = vec![Object::new("plane", Mesh::plane())];
    let mut surface = Surface::new(64, 48, BACKGROUND_COLOR);

    renderer.translate(Vec3::new(0.0, 0.0, 3.0));
    renderer.render_scene(&mut objects, &TextureBank::new(), &mut surface.frame_buffer());

    let outlined = surface.pixels().iter().filter(|&&c| c == OUTLINE_COLOR).count();
    assert!(outlined > 0);
    assert!(surface
        .pixels()
        .iter()
        .all(|&c| c == OUTLINE_COLOR || c == BACKGROUND_COLOR));
}

#[test]
fn toggling_modes_changes_what_is_written() {
    let mut renderer = Renderer::new(RendererConfig::with_screen(64, 48));
    let mut bank = TextureBank::new();
    let id = bank.add(Texture::checkerboard(8, 4, 0xFFFF0000, 0xFF00FF00));
    let mut objects = vec![Object::new("cube", Mesh::cube()).with_texture(id)];
    let mut surface = Surface::new(64, 48, BACKGROUND_COLOR);

    let mut frame = |renderer: &mut Renderer, surface: &mut Surface| {
        let mut fb = surface.frame_buffer();
        fb.clear(BACKGROUND_COLOR);
        renderer.identity();
        renderer.translate(Vec3::new(0.0, 0.0, 4.0));
        renderer.rotate(Vec3::new(25.0, 35.0, 0.0));
        renderer.render_scene(&mut objects, &bank, &mut fb)
    };

    let stats = frame(&mut renderer, &mut surface);
    assert_eq!(stats.faces, 12);
    assert!(stats.visible > 2 && stats.visible <= 6);
    assert!(!surface.pixels().contains(&OUTLINE_COLOR));
    let textured = surface.pixels().iter().filter(|&&c| c != BACKGROUND_COLOR).count();
    assert!(textured > 0);

    renderer.toggle_render_mode(RenderMode::WIREFRAME);
    frame(&mut renderer, &mut surface);
    assert!(surface.pixels().contains(&OUTLINE_COLOR));

    renderer.toggle_render_mode(RenderMode::TEXTURED);
    frame(&mut renderer, &mut surface);
    assert!(surface
        .pixels()
        .iter()
        .all(|&c| c == OUTLINE_COLOR || c == BACKGROUND_COLOR));

    renderer.set_render_mode(RenderMode::empty());
    frame(&mut renderer, &mut surface);
    assert!(surface.pixels().iter().all(|&c| c == BACKGROUND_COLOR));
}

#[test]
fn wider_field_of_view_shrinks_the_image() {
    let mut renderer = Renderer::new(RendererConfig::handheld());
    let mut objects = vec![Object::new("plane", Mesh::plane())];
    let mut bank = TextureBank::new();
    objects[0].set_texture(bank.add(Texture::checkerboard(4, 2, 0xFF000001, 0xFF000002)));

    let mut covered = |renderer: &mut Renderer| {
        let mut surface = Surface::new(320, 240, BACKGROUND_COLOR);
        renderer.identity();
        renderer.translate(Vec3::new(0.0, 0.0, 3.0));
        renderer.render_scene(&mut objects, &bank, &mut surface.frame_buffer());
        surface.pixels().iter().filter(|&&c| c != BACKGROUND_COLOR).count()
    };

    renderer.set_fov(60.0);
    let narrow = covered(&mut renderer);
    renderer.set_fov(100.0);
    let wide = covered(&mut renderer);
    assert!(narrow > wide, "{narrow} <= {wide}");

    // Out-of-range values clamp rather than fail.
    renderer.set_fov(10.0);
    assert_eq!(renderer.fov(), 60.0);
}

#[test]
fn viewport_offset_moves_the_image() {
    let mut renderer = Renderer::new(RendererConfig::with_screen(64, 48));
    let mut objects = vec![Object::new("plane", Mesh::plane())];
    let mut bank = TextureBank::new();
    objects[0].set_texture(bank.add(Texture::checkerboard(4, 2, 0xFF000001, 0xFF000001)));

    renderer.set_viewport(-20, 0, 64, 48);
    let mut surface = Surface::new(64, 48, BACKGROUND_COLOR);
    renderer.translate(Vec3::new(0.0, 0.0, 3.0));
    renderer.render_scene(&mut objects, &bank, &mut surface.frame_buffer());

    let fb = surface.frame_buffer();
    assert_eq!(fb.get_pixel(12, 24), Some(0xFF000001));
    assert_eq!(fb.get_pixel(32, 24), Some(BACKGROUND_COLOR));
}

#[test]
fn flat_bottom_triangle_through_the_span_filler() {
    let texture = Texture::from_pixels(2, 2, vec![1, 2, 3, 4]).unwrap();
    let triangle = ScreenTriangle {
        points: [
            Vec2::new(10.0, 10.0),
            Vec2::new(30.0, 10.0),
            Vec2::new(20.0, 30.0),
        ],
        uvs: [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.5, 1.0)],
    };
    let style = FillStyle {
        mode: RenderMode::TEXTURED,
        outline: OUTLINE_COLOR,
    };
    let mut pixels = vec![0u32; 64 * 64];
    let mut fb = FrameBuffer::new(&mut pixels, 64, 64);
    let mut raster = SpanRasterizer::new(64);

    let shape = raster
        .fill_triangle(&triangle, Some(&texture), &style, &mut fb)
        .unwrap();

    assert_eq!(shape, TriangleShape::FlatBottom);
    assert_eq!(raster.spans().scanlines(), 10..30);
    assert_eq!(fb.get_pixel(10, 10), Some(1));
    assert_eq!(fb.get_pixel(20, 9), Some(0));
    assert_eq!(fb.get_pixel(20, 30), Some(0));
}

#[test]
fn random_poses_never_write_out_of_bounds() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut config = RendererConfig::handheld();
    config.render_mode = RenderMode::TEXTURED | RenderMode::WIREFRAME;
    let mut renderer = Renderer::new(config);
    let mut bank = TextureBank::new();
    let id = bank.add(Texture::checkerboard(16, 4, 0xFFFFFFFE, 0xFF000001));
    let mut objects = vec![Object::new("cube", Mesh::cube()).with_texture(id)];

    // A padded surface: anything written past the visible width would land in
    // the padding and be caught below.
    let (width, height, pitch) = (320u32, 240u32, 336usize);
    let mut pixels = vec![0u32; pitch * height as usize];

    for _ in 0..200 {
        let depth = rng.gen_range(-2.0..12.0);
        let angles = Vec3::new(
            rng.gen_range(0.0..360.0),
            rng.gen_range(0.0..360.0),
            rng.gen_range(0.0..360.0),
        );
        let mut fb = FrameBuffer::with_pitch(&mut pixels, width, height, pitch);
        renderer.identity();
        renderer.translate(Vec3::new(rng.gen_range(-3.0..3.0), rng.gen_range(-3.0..3.0), depth));
        renderer.rotate(angles);
        renderer.render_scene(&mut objects, &bank, &mut fb);
    }

    for row in pixels.chunks(pitch) {
        assert!(row[width as usize..].iter().all(|&c| c == 0));
    }
}
