use engine::controls::{Control, ControlId, ControlSet};
use engine::graphics::{CpuRenderer, Renderer2d, glyph_advance_x, text_height};
use engine::surface::{FrameBuffer, SurfaceSize};
use engine::ui::{Anchor, Insets, Rect, Size};

const INK: [u8; 4] = [240, 240, 240, 255];

#[test]
fn text_is_case_insensitive_and_advances_per_glyph() {
    let mut upper = FrameBuffer::new(SurfaceSize::new(64, 16));
    let mut lower = FrameBuffer::new(SurfaceSize::new(64, 16));
    upper.renderer().draw_text_scaled(1, 1, "GOLD", INK, 2);
    lower.renderer().draw_text_scaled(1, 1, "gold", INK, 2);
    assert_eq!(upper.digest(), lower.digest());

    // Nothing is drawn below the glyph box.
    for x in 0..64 {
        assert_eq!(upper.pixel(x, 1 + text_height(2)), Some([0, 0, 0, 0]));
    }
    assert!(upper.count_color(INK) > 0);
    assert_eq!(glyph_advance_x(2) * 4, 32);
}

#[test]
fn cpu_renderer_over_a_raw_buffer_matches_the_frame_buffer() {
    let size = SurfaceSize::new(32, 24);
    let mut raw = vec![0u8; size.rgba_len()];
    {
        let mut gfx = CpuRenderer::new(&mut raw, size);
        gfx.fill_rect(Rect::new(4, 4, 8, 8), INK);
        gfx.circle_outline(20, 12, 5, INK);
    }

    let mut fb = FrameBuffer::new(size);
    {
        let mut gfx = fb.renderer();
        gfx.fill_rect(Rect::new(4, 4, 8, 8), INK);
        gfx.circle_outline(20, 12, 5, INK);
    }
    assert_eq!(fb.frame(), raw.as_slice());
}

#[test]
fn anchored_menu_buttons_hit_test_after_layout() {
    let screen = Rect::from_size(640, 360);
    let safe = screen.inset(Insets::all(32));
    let panel = safe.place(Size::new(300, 200), Anchor::Center);
    let rows = panel.inset(Insets::all(18)).split_rows(3, 44, 12);
    assert_eq!(rows.len(), 3);

    let mut set = ControlSet::new();
    for (i, row) in rows.iter().enumerate() {
        set.push(Control::new(ControlId(i as u32), *row, i));
    }
    for (i, row) in rows.iter().enumerate() {
        let (x, y) = row.center();
        assert_eq!(set.click(x, y), Some(i));
    }
    assert_eq!(set.click(panel.x, panel.y), None);
}
