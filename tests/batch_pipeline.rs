//! End-to-end runs through the public library API.

use std::io::{Cursor, Read};

use pretty_assertions::assert_eq;
use zip::ZipArchive;

use cardforge::{CardProfile, render_single, run_batch, sha256_hex};

const ROSTER: &str = "name,member_id\n\
    Ada Lovelace,\n\
    Grace Hopper,GH-7\n\
    ,IGNORED\n\
    Alan Turing,\n\
    Katherine Johnson,\n";

#[test]
fn batch_writes_two_entries_per_named_row() {
    let output = run_batch(ROSTER.as_bytes(), &CardProfile::default()).unwrap();
    let mut zip = ZipArchive::new(Cursor::new(output.archive)).unwrap();

    let names: Vec<String> = (0..zip.len())
        .map(|i| zip.by_index(i).unwrap().name().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "MH000001_front.png",
            "MH000001_back.png",
            "GH-7_front.png",
            "GH-7_back.png",
            "MH000002_front.png",
            "MH000002_back.png",
            "MH000003_front.png",
            "MH000003_back.png",
        ]
    );
    assert_eq!(output.report.skipped, 1);
    assert_eq!(output.report.produced(), 4);

    let mut png = Vec::new();
    zip.by_name("MH000001_front.png")
        .unwrap()
        .read_to_end(&mut png)
        .unwrap();
    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (1011, 638));
}

#[test]
fn single_card_previews_first_sequenced_id() {
    let card = render_single(&CardProfile::default()).unwrap();
    assert_eq!(card.identifier, "MH000001");
    assert_eq!(card.front.image().dimensions(), (1011, 638));
    assert_eq!(card.back.image().dimensions(), (1011, 638));
}

#[test]
fn rendering_is_deterministic() {
    let profile = CardProfile::default().for_member("Ada Lovelace", "MH000042");
    let first = render_single(&profile).unwrap();
    let second = render_single(&profile).unwrap();
    assert!(first.front == second.front);
    assert!(first.back == second.back);
}

#[test]
fn batch_archive_matches_single_render() {
    let base = CardProfile::default();
    let output = run_batch("name\nAda Lovelace\n".as_bytes(), &base).unwrap();
    let single = render_single(&base.for_member("Ada Lovelace", "MH000001")).unwrap();
    let entry = &output.report.cards[0];
    assert_eq!(
        entry.front_sha256,
        sha256_hex(&single.front.to_png().unwrap())
    );
}
