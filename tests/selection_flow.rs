//! End-to-end selection flow: build a chapter, drag a selection across two
//! verses by raw byte offsets, normalize and collapse it, persist the
//! resulting highlight, and see it tint the rebuilt text.

use tempfile::TempDir;
use versemark::builder::build_chapter;
use versemark::chapter::{Chapter, Verse};
use versemark::highlight::{Highlight, HighlightColor};
use versemark::position::LogicalPosition;
use versemark::selection::span_for_range;
use versemark::store::HighlightStore;
use versemark::{overlay, theme};

fn shepherd_chapter() -> Chapter {
    Chapter {
        number: 10,
        verses: vec![
            Verse {
                number: 10,
                text: "The thief comes only to steal".to_string(),
            },
            Verse {
                number: 11,
                text: "I am the good shepherd".to_string(),
            },
        ],
    }
}

#[test]
fn select_across_verses_commit_and_reapply() {
    let chapter = shepherd_chapter();
    let palette = theme::current_theme();
    let built = build_chapter("john", &chapter, 16, &[], palette);

    // Drag from the start of "thief" (verse 10, word 1) to inside "good"
    // (verse 11, word 3).
    let thief_at = built.raw.find("thief").unwrap();
    let good_at = built.raw.find("good").unwrap() + 2;
    let span = span_for_range("john", 10, thief_at, good_at + 1, &built.words).unwrap();

    let normalized = span.normalize();
    assert_eq!(normalized.start, LogicalPosition::new(10, 1));
    assert_eq!(normalized.end, LogicalPosition::new(11, 3));

    let range = span.to_verse_range();
    assert_eq!(range.start_verse, 10);
    assert_eq!(range.end_verse, 11);

    // Persist and reload the highlight through the store.
    let dir = TempDir::new().unwrap();
    let highlight = Highlight::word_level(span, HighlightColor::Green).with_note("shepherd");
    let id = highlight.id;
    {
        let mut store = HighlightStore::open("john", Some(dir.path())).unwrap();
        store.add(highlight).unwrap();
    }
    let store = HighlightStore::open("john", Some(dir.path())).unwrap();
    let restored = store.get(id).unwrap();
    assert_eq!(restored.note.as_deref(), Some("shepherd"));

    // Rebuild with the persisted highlight applied; the build key must
    // differ from the highlight-free build.
    let highlights: Vec<_> = store
        .chapter_highlights("john", 10)
        .into_iter()
        .cloned()
        .collect();
    let rebuilt = build_chapter("john", &chapter, 16, &highlights, palette);
    assert_ne!(rebuilt.key, built.key);

    // Every word between (10,1) and (11,3) inclusive is tinted, and the
    // span's neighbors are not.
    for entry in rebuilt.words.iter() {
        let tint = overlay::color_for(entry.pos, "john", 10, &highlights);
        let inside = LogicalPosition::new(10, 1) <= entry.pos
            && entry.pos <= LogicalPosition::new(11, 3);
        assert_eq!(tint.is_some(), inside, "wrong tint at {:?}", entry.pos);
    }
    assert_eq!(
        overlay::color_for(LogicalPosition::new(10, 0), "john", 10, &highlights),
        None
    );
    assert_eq!(
        overlay::color_for(LogicalPosition::new(11, 4), "john", 10, &highlights),
        None
    );
}

#[test]
fn backwards_drag_yields_same_highlight() {
    let chapter = shepherd_chapter();
    let built = build_chapter("john", &chapter, 16, &[], theme::current_theme());

    let thief_at = built.raw.find("thief").unwrap();
    let good_at = built.raw.find("good").unwrap() + 2;

    let forward = span_for_range("john", 10, thief_at, good_at + 1, &built.words).unwrap();
    // A backwards drag reports the same half-open byte range; direction
    // only shows up in which endpoint the input layer calls the anchor.
    let collapsed = forward.to_verse_range();
    let backwards =
        versemark::Span::new("john", 10, forward.end, forward.start).to_verse_range();
    assert_eq!(collapsed, backwards);
}

#[test]
fn empty_chapter_maps_no_selection() {
    let chapter = Chapter {
        number: 1,
        verses: vec![Verse {
            number: 1,
            text: "   ".to_string(),
        }],
    };
    let built = build_chapter("john", &chapter, 16, &[], theme::current_theme());
    assert!(built.words.is_empty());
    assert!(span_for_range("john", 1, 0, built.raw.len(), &built.words).is_none());
}
