use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use pretty_assertions::assert_eq;
use proxysheet::{
    Diagnostic, Geometry, ImageKey, Pipeline, PipelineConfig, ProxyError, RecordingDiagnostics,
    ResolveError, Section,
};
use tempfile::{TempDir, tempdir};

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("images")).unwrap();
        Self { dir }
    }

    fn images(&self) -> PathBuf {
        self.dir.path().join("images")
    }

    fn image(&self, name: &str) -> &Self {
        RgbImage::from_pixel(10, 14, Rgb([120, 20, 20]))
            .save(self.images().join(name))
            .unwrap();
        self
    }

    fn deck(&self, text: &str) -> PathBuf {
        let path = self.dir.path().join("deck.txt");
        fs::write(&path, text).unwrap();
        path
    }

    fn config(&self, text: &str) -> PipelineConfig {
        PipelineConfig::new(self.deck(text), self.images())
    }
}

fn file_names(planned: &proxysheet::PlannedRun) -> Vec<Vec<String>> {
    planned
        .plan
        .pages
        .iter()
        .map(|page| {
            page.cells
                .iter()
                .map(|cell| name_of(cell.image.path()))
                .collect()
        })
        .collect()
}

fn name_of(path: &Path) -> String {
    path.file_name().unwrap().to_string_lossy().into_owned()
}

#[test]
fn crypt_cards_print_before_library_cards() {
    let fx = Fixture::new();
    fx.image("bum.jpg").image("draculag3.jpg");
    let pipeline = Pipeline::new(fx.config("4 Bum\n1 Crypt:\n1 Dracula"));
    let sink = RecordingDiagnostics::new();

    let planned = pipeline.plan(&sink).unwrap();

    assert_eq!(
        file_names(&planned),
        vec![vec!["draculag3.jpg", "bum.jpg", "bum.jpg", "bum.jpg", "bum.jpg"]]
    );
    let cells: Vec<(usize, usize)> = planned.plan.pages[0]
        .cells
        .iter()
        .map(|cell| (cell.row, cell.column))
        .collect();
    assert_eq!(cells, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1)]);
    assert!(sink.is_empty());

    let summary = pipeline.run(&sink).unwrap();
    assert_eq!(summary.output, fx.dir.path().join("deck.pdf"));
    assert_eq!(summary.pages, 1);
    assert_eq!(summary.placed, 5);
    assert_eq!(summary.requested, 5);
    assert_eq!(summary.resolved_groups, 1);
    let written = lopdf::Document::load(&summary.output).unwrap();
    assert_eq!(written.get_pages().len(), 1);
}

#[test]
fn ambiguous_groups_abort_before_writing() {
    let fx = Fixture::new();
    fx.image("bum.jpg").image("draculag3.jpg").image("draculag5.jpg");
    let config = fx.config("4 Bum\nCrypt (1 card)\n1 Dracula");
    let output = config.output.clone();

    let err = Pipeline::new(config)
        .run(&RecordingDiagnostics::new())
        .unwrap_err();

    match err {
        ProxyError::Resolve(ResolveError::AmbiguousGroup {
            key,
            matched_groups,
        }) => {
            assert_eq!(key, ImageKey::plain("dracula"));
            let groups: Vec<u8> = matched_groups.iter().map(|g| g.get()).collect();
            assert_eq!(groups, vec![3, 5]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!output.exists());
}

#[test]
fn missing_images_shrink_the_sheet_but_do_not_fail() {
    let fx = Fixture::new();
    fx.image("deflection.jpg");
    let pipeline = Pipeline::new(fx.config("2 Deflection\n3 Bum's Rush\nCrypt:\n1 Nobody"));
    let sink = RecordingDiagnostics::new();

    let summary = pipeline.run(&sink).unwrap();

    assert_eq!(summary.placed, 2);
    assert_eq!(summary.requested, 6);
    assert_eq!(
        sink.entries(),
        vec![
            Diagnostic::UnresolvedGroup {
                key: ImageKey::plain("nobody"),
            },
            Diagnostic::MissingImage {
                section: Section::Crypt,
                key: ImageKey::plain("nobody"),
                path: fx.images().join("nobody.jpg"),
            },
            Diagnostic::MissingImage {
                section: Section::Library,
                key: ImageKey::plain("bumsrush"),
                path: fx.images().join("bumsrush.jpg"),
            },
        ]
    );
}

#[test]
fn nothing_found_still_writes_an_empty_document() {
    let fx = Fixture::new();
    let pipeline = Pipeline::new(fx.config("Crypt:\n2 Nobody"));

    let summary = pipeline.run(&RecordingDiagnostics::new()).unwrap();

    assert_eq!(summary.pages, 0);
    assert!(summary.output.is_file());
}

#[test]
fn large_decks_spill_onto_further_pages() {
    let fx = Fixture::new();
    fx.image("bum.jpg").image("urg4adv.jpg");
    let pipeline = Pipeline::new(fx.config("9 Bum\nCrypt:\n1 Ur (ADV)"));

    let planned = pipeline.plan(&RecordingDiagnostics::new()).unwrap();

    let names = file_names(&planned);
    assert_eq!(names.len(), 2);
    assert_eq!(names[0][0], "urg4adv.jpg");
    assert_eq!(names[0].len(), 9);
    assert_eq!(names[1], vec!["bum.jpg"]);
    assert_eq!(
        (planned.plan.pages[1].cells[0].row, planned.plan.pages[1].cells[0].column),
        (0, 0)
    );
}

#[test]
fn custom_geometry_changes_the_grid() {
    let fx = Fixture::new();
    fx.image("bum.jpg");
    let mut config = fx.config("5 Bum");
    config.geometry = Geometry {
        images_per_row: 2,
        rows_per_page: 2,
        ..Geometry::default()
    };

    let planned = Pipeline::new(config).plan(&RecordingDiagnostics::new()).unwrap();

    let sizes: Vec<usize> = planned.plan.pages.iter().map(|p| p.cells.len()).collect();
    assert_eq!(sizes, vec![4, 1]);
}

#[test]
fn unreadable_deck_lists_are_reported() {
    let fx = Fixture::new();
    let config = PipelineConfig::new(fx.dir.path().join("absent.txt"), fx.images());

    let err = Pipeline::new(config)
        .run(&RecordingDiagnostics::new())
        .unwrap_err();

    assert!(matches!(err, ProxyError::DeckList(_)));
}

#[test]
fn missing_grouped_crypt_cards_are_reported_once() {
    let fx = Fixture::new();
    let pipeline = Pipeline::new(fx.config("Crypt:\n1 Dracula (G3)"));
    let sink = RecordingDiagnostics::new();

    let summary = pipeline.run(&sink).unwrap();

    assert_eq!(summary.placed, 0);
    assert_eq!(
        sink.entries(),
        vec![Diagnostic::MissingImage {
            section: Section::Crypt,
            key: ImageKey::from_crypt_name("Dracula (G3)"),
            path: fx.images().join("draculag3.jpg"),
        }]
    );
}

#[test]
fn advanced_marker_may_touch_the_name() {
    let fx = Fixture::new();
    fx.image("urg4adv.jpg");
    let pipeline = Pipeline::new(fx.config("Crypt:\n1 Ur(Adv)"));
    let sink = RecordingDiagnostics::new();

    let planned = pipeline.plan(&sink).unwrap();

    assert_eq!(file_names(&planned), vec![vec!["urg4adv.jpg"]]);
    assert!(sink.is_empty());
}
