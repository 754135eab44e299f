use pageport::document::{DocumentEngine, Frame, MemoryDocument, PageSpec};
use pageport::geometry::{Geometry, Orientation, ScreenSize, Size};
use pageport::persist::{ViewSettings, settings_path};
use pageport::script;
use pageport::viewport::Viewport;
use pageport::{Command, Effect, FrameStatus, NavError, NavInput, NavOutcome, ViewportController};
use tempfile::TempDir;

const SCREEN: ScreenSize = Size::new(600, 800);

fn page(width: u32, height: u32) -> PageSpec {
    PageSpec {
        width,
        height,
        corrupt: false,
    }
}

fn mixed_document() -> MemoryDocument {
    MemoryDocument::new(vec![
        page(1200, 1440),
        page(1000, 1500),
        page(1500, 1000),
        page(800, 3000),
    ])
}

fn open(
    doc: MemoryDocument,
    page: usize,
    settings: ViewSettings,
) -> ViewportController<MemoryDocument> {
    ViewportController::open(doc, SCREEN, page, settings).unwrap()
}

fn settings_on(page: usize) -> ViewSettings {
    ViewSettings {
        page,
        ..ViewSettings::default()
    }
}

fn assert_in_bounds(geometry: Geometry, context: &str) {
    assert!(geometry.page.width >= 1 && geometry.page.height >= 1, "{context}: {geometry:?}");
    assert!(geometry.within_bounds(), "{context}: view escaped page: {geometry:?}");
}

#[test]
fn view_stays_inside_page_for_every_mode_and_zoom() {
    let commands = script::parse("jjjj kkkk llhh LLHH ]][[ +*jj --__ jJkK :2 jjj ll :4 jjjj c jjj w 0 j").unwrap();

    for landscape in [false, true] {
        for multi_column in [false, true] {
            for zoom_factor in [0.02, 0.3, 1.0, 1.37, 2.0, 4.5, 8.0] {
                for start in 0..4 {
                    let settings = ViewSettings {
                        zoom_factor,
                        landscape,
                        multi_column,
                        origin_x: u32::MAX,
                        origin_y: u32::MAX,
                        page: start,
                        ..ViewSettings::default()
                    };
                    let mut ctl = open(mixed_document(), start, settings);
                    let context = format!("landscape={landscape} multi={multi_column} zoom={zoom_factor} page={start}");
                    assert_in_bounds(ctl.geometry(), &context);

                    for cmd in &commands {
                        let _ = ctl.apply(*cmd);
                        assert_in_bounds(ctl.geometry(), &format!("{context} after {cmd:?}"));
                    }
                }
            }
        }
    }
}

#[test]
fn orientation_change_keeps_view_inside_page() {
    for zoom in [0.5, 1.0, 2.5, 6.0] {
        for aspect in [0.7, 1.2, 1.5, 3.75] {
            let mut vp = Viewport::default();
            vp.recompute(SCREEN, zoom, aspect);
            vp.geometry.view.x = vp.geometry.limit(pageport::geometry::Axis::Horizontal);
            vp.geometry.view.y = vp.geometry.limit(pageport::geometry::Axis::Vertical);

            vp.orientation = vp.orientation.toggled();
            vp.recompute(SCREEN, zoom, aspect);
            assert_in_bounds(vp.geometry, &format!("zoom={zoom} aspect={aspect}"));
        }
    }

    let settings = ViewSettings {
        zoom_factor: 3.0,
        ..settings_on(3)
    };
    let mut ctl = open(mixed_document(), 3, settings);
    for _ in 0..5 {
        ctl.apply(Command::Navigate(NavInput::Forward)).unwrap();
        ctl.apply(Command::Navigate(NavInput::ShiftForward)).unwrap();
    }
    ctl.apply(Command::ToggleOrientation).unwrap();
    assert_eq!(ctl.orientation(), Orientation::Landscape);
    assert_in_bounds(ctl.geometry(), "after toggle");
}

#[test]
fn save_then_restore_changes_nothing() {
    let settings = ViewSettings {
        zoom_factor: 2.5,
        landscape: true,
        multi_column: true,
        ..settings_on(1)
    };
    let mut ctl = open(mixed_document(), 1, settings);
    ctl.apply(Command::Navigate(NavInput::Backward)).unwrap();
    ctl.apply(Command::Navigate(NavInput::ShiftBackward)).unwrap();
    let geometry = ctl.geometry();
    let zoom = ctl.zoom();

    ctl.apply(Command::SaveView).unwrap();
    ctl.apply(Command::RestoreView).unwrap();

    assert_eq!(ctl.geometry(), geometry);
    assert_eq!(ctl.zoom(), zoom);
    assert_eq!(ctl.orientation(), Orientation::Landscape);
    assert_eq!(ctl.page(), 1);
}

#[test]
fn advancing_then_retreating_returns_to_origin() {
    let portrait = ViewSettings {
        zoom_factor: 4.0,
        origin_y: 1000,
        ..settings_on(1)
    };
    let landscape = ViewSettings {
        zoom_factor: 4.0,
        landscape: true,
        origin_x: 2000,
        ..settings_on(1)
    };

    for settings in [portrait, landscape] {
        for steps in 1..=2 {
            let mut ctl = open(mixed_document(), 1, settings.clone());
            let start = ctl.geometry().view;

            for _ in 0..steps {
                assert_eq!(ctl.navigate(NavInput::Forward), Ok(NavOutcome::Moved));
            }
            assert_ne!(ctl.geometry().view, start);
            for _ in 0..steps {
                assert_eq!(ctl.navigate(NavInput::Backward), Ok(NavOutcome::Moved));
            }
            assert_eq!(ctl.geometry().view, start, "{steps} steps with {settings:?}");
        }
    }
}

#[test]
fn single_page_document_never_turns() {
    let mut ctl = open(MemoryDocument::uniform(1, 1200, 1440), 0, ViewSettings::default());
    let geometry = ctl.geometry();

    for cmd in [
        Command::Navigate(NavInput::Forward),
        Command::Navigate(NavInput::Backward),
        Command::NavigateLong(NavInput::Forward),
        Command::NavigateLong(NavInput::Backward),
        Command::NextColumn,
        Command::PrevColumn,
        Command::GoToPage(1),
    ] {
        let result = ctl.apply(cmd);
        assert!(
            matches!(result, Err(NavError::DocumentBoundary { page_count: 1, .. })),
            "{cmd:?} gave {result:?}"
        );
        assert_eq!(ctl.geometry(), geometry);
        assert_eq!(ctl.page(), 0);
    }
    assert_eq!(ctl.engine().decode_count(), 1);
}

#[test]
fn two_column_page_hops_once_then_hits_page_edge() {
    let settings = ViewSettings {
        zoom_factor: 2.0,
        multi_column: true,
        horizontal_shift: 100,
        ..ViewSettings::default()
    };
    let mut ctl = open(MemoryDocument::uniform(1, 1000, 1500), 0, settings);
    assert_eq!(ctl.geometry().page.width, 2 * SCREEN.width);

    assert_eq!(ctl.navigate(NavInput::Forward), Ok(NavOutcome::Moved));
    assert_eq!(ctl.navigate(NavInput::Forward), Ok(NavOutcome::Moved));
    assert_eq!(ctl.geometry().view.y, 1000);

    assert_eq!(ctl.navigate(NavInput::Forward), Ok(NavOutcome::ColumnHop));
    assert_eq!(ctl.geometry().view.x, 600);
    assert_eq!(ctl.geometry().view.y, 0);

    assert_eq!(ctl.navigate(NavInput::Forward), Ok(NavOutcome::Moved));
    assert_eq!(ctl.navigate(NavInput::Forward), Ok(NavOutcome::Moved));
    assert!(ctl.navigate(NavInput::Forward).unwrap_err().is_boundary());
    assert_eq!(ctl.geometry().view.x, 600);
    assert_eq!(ctl.geometry().view.y, 1000);
}

#[test]
fn default_shift_on_two_column_page_hops_twice() {
    let settings = ViewSettings {
        zoom_factor: 2.0,
        multi_column: true,
        ..ViewSettings::default()
    };
    let mut ctl = open(MemoryDocument::uniform(2, 1000, 1500), 0, settings);
    assert_eq!(ctl.shift().secondary, 95);

    let mut hops = Vec::new();
    loop {
        match ctl.navigate(NavInput::Forward) {
            Ok(NavOutcome::Moved) => {}
            Ok(NavOutcome::ColumnHop) => {
                assert_eq!(ctl.geometry().view.y, 0);
                hops.push(ctl.geometry().view.x);
            }
            other => {
                assert_eq!(other, Ok(NavOutcome::PageTurned));
                break;
            }
        }
    }
    // 95% of 600 lands 30px short of the right edge, so the last column is
    // reached by a second short hop
    assert_eq!(hops, [570, 600]);
    assert_eq!(ctl.page(), 1);
}

#[test]
fn page_that_fits_the_screen_turns_on_next_input() {
    let mut ctl = open(MemoryDocument::uniform(2, 1200, 1440), 0, ViewSettings::default());
    assert_eq!(ctl.geometry().page, Size::new(600, 720));
    assert_eq!(ctl.geometry().view.size(), Size::new(600, 720));

    assert_eq!(ctl.navigate(NavInput::Forward), Ok(NavOutcome::PageTurned));
    assert_eq!(ctl.page(), 1);
    assert_eq!(ctl.geometry().view.y, 0);
}

#[test]
fn failed_decode_leaves_previous_page_in_place() {
    let mut doc = MemoryDocument::uniform(3, 1000, 1500);
    doc.mark_corrupt(1);
    let settings = ViewSettings {
        zoom_factor: 2.0,
        ..ViewSettings::default()
    };
    let mut ctl = open(doc, 0, settings);
    ctl.navigate(NavInput::Forward).unwrap();
    ctl.navigate(NavInput::Forward).unwrap();
    let geometry = ctl.geometry();
    ctl.take_effects();

    let result = ctl.navigate(NavInput::Forward);
    assert!(matches!(result, Err(NavError::Decode { page: 1, .. })));
    assert!(!result.unwrap_err().is_boundary());
    assert_eq!(ctl.page(), 0);
    assert_eq!(ctl.geometry(), geometry);
    assert!(ctl.take_effects().is_empty());

    assert_eq!(ctl.apply(Command::GoToPage(2)), Ok(NavOutcome::PageTurned));
    assert!(matches!(
        ctl.navigate(NavInput::Backward),
        Err(NavError::Decode { page: 1, .. })
    ));
    assert_eq!(ctl.page(), 2);
}

#[test]
fn landscape_swaps_next_and_previous_keys() {
    let doc = || MemoryDocument::uniform(3, 1200, 1440);
    let mut portrait = open(doc(), 1, settings_on(1));
    let mut landscape = open(
        doc(),
        1,
        ViewSettings {
            landscape: true,
            ..settings_on(1)
        },
    );
    landscape.apply(Command::ResetView).unwrap();

    portrait.navigate(NavInput::Forward).unwrap();
    assert_eq!(portrait.page(), 2);

    while landscape.navigate(NavInput::Forward) == Ok(NavOutcome::Moved) {}
    assert_eq!(landscape.page(), 0);

    landscape.apply(Command::NavigateLong(NavInput::Backward)).unwrap();
    assert_eq!(landscape.page(), 2);
}

#[test]
fn remembered_view_applies_only_on_its_page() {
    let dir = TempDir::new().unwrap();
    let ini = settings_path(&dir.path().join("book.json"));

    let settings = ViewSettings {
        zoom_factor: 2.0,
        ..settings_on(1)
    };
    let mut ctl = open(mixed_document(), 1, settings);
    ctl.navigate(NavInput::Forward).unwrap();
    ctl.navigate(NavInput::ShiftForward).unwrap();
    ctl.apply(Command::ToggleMultiColumn).unwrap();
    ctl.view_settings().save(&ini).unwrap();

    let stored = ViewSettings::load(&ini).unwrap().unwrap();
    let same_page = open(mixed_document(), 1, stored.clone());
    assert_eq!(same_page.geometry(), ctl.geometry());
    assert!(same_page.multi_column());

    let other_page = open(mixed_document(), 0, stored);
    assert_eq!(other_page.view_settings(), settings_on(0));
    assert_eq!(other_page.geometry().view.x, 0);
    assert_eq!(other_page.geometry().view.y, 0);
}

#[test]
fn frame_is_rerendered_exactly_when_invalidated() {
    let settings = ViewSettings {
        zoom_factor: 2.0,
        ..ViewSettings::default()
    };
    let mut ctl = open(mixed_document(), 0, settings);
    let mut frame = Frame::new(SCREEN);
    assert_eq!(ctl.render_frame(&mut frame), Ok(FrameStatus::Rendered));
    ctl.take_effects();

    for cmd in script::parse("jjhl m kkk w j ' c ] + 0 o jj :3 K").unwrap() {
        let _ = ctl.apply(cmd);
        let invalidated = ctl.take_effects().contains(&Effect::InvalidateFrame);
        let expected = if invalidated {
            FrameStatus::Rendered
        } else {
            FrameStatus::Cached
        };
        assert_eq!(ctl.render_frame(&mut frame), Ok(expected), "after {cmd:?}");
    }
    assert!(ctl.engine().render_count() > 1);
    assert_eq!(ctl.engine().page_count(), 4);
}
