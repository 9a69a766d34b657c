use rstest::rstest;
use runebreak::alphabets::KnownAlphabet;
use runebreak::config::ScoreWeights;
use runebreak::scorer::ScoreModel;
use runebreak::stream::CipherStream;
use runebreak::transpose;
use std::io::Cursor;
use std::sync::Arc;

fn stream_of(n: u8) -> CipherStream {
    CipherStream::from_indices((0..n).collect())
}

#[test]
fn test_columnar_read_known_grid() {
    // 12 symbols, width 3:
    //   0  1  2
    //   3  4  5
    //   6  7  8
    //   9 10 11
    let reordered = transpose::read_columnar(&stream_of(12), 3).unwrap();
    assert_eq!(reordered.indices(), &[0, 3, 6, 9, 1, 4, 7, 10, 2, 5, 8, 11]);
}

#[test]
fn test_columnar_write_inverts_read_full_grid() {
    let original = stream_of(12);
    let read = transpose::read_columnar(&original, 3).unwrap();
    let back = transpose::write_columnar(&read, 3).unwrap();
    assert_eq!(back.indices(), original.indices());
}

#[rstest]
#[case(10, 3)]
#[case(11, 4)]
#[case(7, 5)]
#[case(29, 6)]
fn test_columnar_write_inverts_read_ragged(#[case] len: u8, #[case] width: usize) {
    let original = stream_of(len);
    let read = transpose::read_columnar(&original, width).unwrap();
    assert_eq!(read.len(), original.len());
    let back = transpose::write_columnar(&read, width).unwrap();
    assert_eq!(back.indices(), original.indices());
}

#[test]
fn test_columnar_wide_grid_is_identity() {
    let original = stream_of(5);
    let reordered = transpose::read_columnar(&original, 20).unwrap();
    assert_eq!(reordered.indices(), original.indices());
}

#[test]
fn test_columnar_rejects_zero_width() {
    assert!(transpose::read_columnar(&stream_of(5), 0).is_err());
    assert!(transpose::write_columnar(&stream_of(5), 0).is_err());
}

#[test]
fn test_rail_fence_known_zigzag() {
    // 6 symbols over 3 rails:
    //   0 . . . 4 .
    //   . 1 . 3 . 5
    //   . . 2 . . .
    let reordered = transpose::read_rail_fence(&stream_of(6), 3).unwrap();
    assert_eq!(reordered.indices(), &[0, 4, 1, 3, 5, 2]);
}

#[test]
fn test_rail_fence_degenerate_cases() {
    let original = stream_of(6);
    let one_rail = transpose::read_rail_fence(&original, 1).unwrap();
    assert_eq!(one_rail.indices(), original.indices());

    let too_many = transpose::read_rail_fence(&original, 10).unwrap();
    assert_eq!(too_many.indices(), original.indices());

    assert!(transpose::read_rail_fence(&original, 0).is_err());
}

#[test]
fn test_reordering_preserves_marks() {
    let alphabet = KnownAlphabet::GematriaPrimus.build().unwrap();
    let stream = alphabet.tokenize_lossy("THE WISDOM");
    assert!(!stream.marks().is_empty());

    let reordered = transpose::read_columnar(&stream, 3).unwrap();
    assert_eq!(reordered.marks(), stream.marks());
}

#[test]
fn test_probe_detects_columnar_scramble() {
    let alphabet = Arc::new(KnownAlphabet::GematriaPrimus.build().unwrap());
    let model = ScoreModel::from_readers(
        alphabet.clone(),
        Cursor::new("TH\t271\nHE\t233\nTHE\t181\n"),
        None::<std::io::Empty>,
        &ScoreWeights::default(),
    )
    .unwrap();

    // "THETHETHETHE" written into a 2-wide grid and read column-major.
    let plain = alphabet.tokenize("THETHETHETHE").unwrap();
    let scrambled = transpose::read_columnar(&plain, 2).unwrap();

    // Reading the 8-symbol scramble back with width 4 restores the text.
    let probes = transpose::probe(&scrambled, &model, &[2, 3, 4], &[2, 3]).unwrap();
    assert_eq!(probes[0].description, "columnar width 4");

    let identity = probes
        .iter()
        .find(|p| p.description == "identity")
        .expect("baseline row present");
    assert!(probes[0].score > identity.score);
}

#[test]
fn test_probe_reports_baseline_when_nothing_improves() {
    let alphabet = Arc::new(KnownAlphabet::GematriaPrimus.build().unwrap());
    let model = ScoreModel::from_readers(
        alphabet.clone(),
        Cursor::new("THE\t181\n"),
        None::<std::io::Empty>,
        &ScoreWeights::default(),
    )
    .unwrap();

    // Already-good text: every reordering scores at or below identity.
    let plain = alphabet.tokenize("THETHETHETHE").unwrap();
    let probes = transpose::probe(&plain, &model, &[2, 3], &[2, 3]).unwrap();
    assert_eq!(probes[0].description, "identity");
}
