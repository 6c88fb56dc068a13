use polytris::core::GameState;
use polytris::term::{GameView, Overlay, Rgb, Viewport};
use polytris::types::GameConfig;

fn small_state() -> GameState {
    GameState::new(
        GameConfig {
            cols: 10,
            rows: 20,
            ..GameConfig::default()
        },
        1,
    )
}

#[test]
fn term_view_renders_border_corners() {
    let snap = small_state().snapshot();
    let view = GameView::default();

    // With cell_w=2 and cell_h=1:
    // board pixels = 10*2 by 20*1 => 20x20
    // plus border => 22x22
    let vp = Viewport::new(22, 22);
    let fb = view.render(&snap, &Overlay::default(), vp);

    assert_eq!(fb.get(0, 0).unwrap().ch, '┌');
    assert_eq!(fb.get(21, 0).unwrap().ch, '┐');
    assert_eq!(fb.get(0, 21).unwrap().ch, '└');
    assert_eq!(fb.get(21, 21).unwrap().ch, '┘');
}

#[test]
fn term_view_renders_locked_cell_as_two_chars_wide() {
    let mut snap = small_state().snapshot();
    snap.board[19][0] = 1;
    snap.active = None;
    snap.ghost = None;

    let view = GameView::default();
    let fb = view.render(&snap, &Overlay::default(), Viewport::new(22, 22));

    // Inside border: (1,1) origin. Each cell is 2 chars wide.
    let x0 = 1;
    let y0 = 1 + 19;
    let expected = Rgb::from(snap.color(1).unwrap());
    for x in [x0, x0 + 1] {
        let cell = fb.get(x, y0).unwrap();
        assert_eq!(cell.ch, '█');
        assert_eq!(cell.style.fg, expected);
    }
}

#[test]
fn term_view_active_piece_uses_its_palette_color() {
    let snap = small_state().snapshot();
    let active = snap.active.clone().unwrap();
    let fb = GameView::default().render(&snap, &Overlay::default(), Viewport::new(22, 22));

    let expected = Rgb::from(snap.color(active.kind).unwrap());
    for (x, y) in active.cells() {
        let cell = fb.get(1 + 2 * x as u16, 1 + y as u16).unwrap();
        assert_eq!(cell.ch, '█');
        assert_eq!(cell.style.fg, expected);
        assert!(cell.style.bold);
    }
}

#[test]
fn term_view_draws_panel_beside_board() {
    let snap = small_state().snapshot();
    let fb = GameView::default().render(&snap, &Overlay::default(), Viewport::new(60, 24));

    let text: Vec<String> = (0..24).map(|y| fb.row_text(y)).collect();
    for label in ["SCORE", "LEVEL", "LINES", "NEXT"] {
        assert!(
            text.iter().any(|row| row.contains(label)),
            "missing {}",
            label
        );
    }
}
