use super::toc_page::parse_toc_line;
use super::*;
use crate::document::memory::{MemoryDocument, PAGE_HEIGHT};
use crate::layout::{BBox, Block, OutlineEntry};

fn candidate(title: &str, page_num: usize) -> ChapterCandidate {
    ChapterCandidate::new(title, page_num, 1, CandidateSource::StyleHeuristic)
}

fn body_document(page_count: usize) -> MemoryDocument {
    let mut doc = MemoryDocument::blank("book", page_count);
    for index in 0..page_count {
        doc.add_body(index, 10.0, 20);
    }
    doc
}

#[test]
fn patterns_cover_each_language_group() {
    assert_eq!(patterns::matching_group_ids("第1章 はじめに"), vec!["ja_chapter"]);
    assert_eq!(patterns::matching_group_ids("３章　応用"), vec!["ja_chapter"]);
    assert_eq!(patterns::matching_group_ids("第二部 実践編"), vec!["ja_part"]);
    assert_eq!(patterns::matching_group_ids("CHAPTER XII"), vec!["en_chapter"]);
    assert_eq!(patterns::matching_group_ids("Chap. 4: Loops"), vec!["en_chapter"]);
    assert_eq!(patterns::matching_group_ids("Lesson 10"), vec!["en_part"]);
    assert_eq!(patterns::matching_group_ids("Part II"), vec!["en_part"]);
    assert_eq!(patterns::matching_group_ids("Kapitel 2"), vec!["other"]);
    assert_eq!(patterns::matching_group_ids("Capítulo 3"), vec!["other"]);
    assert_eq!(patterns::matching_group_ids("ГЛАВА 5"), vec!["other"]);
}

#[test]
fn patterns_reject_words_that_only_start_like_numerals() {
    assert!(!patterns::matches_any("Chapters of history"));
    assert!(!patterns::matches_any("Chapter Index"));
    assert!(!patterns::matches_any("Participants"));
    assert!(!patterns::matches_any("This chapter 3 reference is inline"));
    assert!(patterns::matches_any("  - Chapter 3"));
}

#[test]
fn matches_groups_restricts_to_named_groups() {
    assert!(patterns::matches_groups("Chapter 1", &["en_chapter"]));
    assert!(!patterns::matches_groups("Chapter 1", &["ja_chapter", "missing"]));
}

#[test]
fn toc_entry_patterns_accept_generic_enumerations() {
    assert!(patterns::is_toc_entry("1. Introduction"));
    assert!(patterns::is_toc_entry("2) Setup"));
    assert!(patterns::is_toc_entry("3 Installing"));
    assert!(patterns::is_toc_entry("Chapter 4 Results"));
    assert!(!patterns::is_toc_entry("1.2 Subsection"));
    assert!(!patterns::is_toc_entry("Preface"));
}

#[test]
fn parse_toc_line_strips_leaders_and_page_number() {
    assert_eq!(
        parse_toc_line("第1章 はじめに ……… 5"),
        Some(("第1章 はじめに".to_string(), 5))
    );
    assert_eq!(
        parse_toc_line("1. Getting Started ........ 12"),
        Some(("1. Getting Started".to_string(), 12))
    );
    assert_eq!(
        parse_toc_line("Chapter 2 - Basics ・・・ １８"),
        Some(("Chapter 2 - Basics".to_string(), 18))
    );
    assert_eq!(parse_toc_line("Preface ..... 3"), None);
    assert_eq!(parse_toc_line("Chapter 7"), None);
}

#[test]
fn outline_detector_keeps_order_levels_and_drops_unresolved_targets() {
    let mut doc = MemoryDocument::blank("book", 20);
    doc.outline = vec![
        OutlineEntry {
            level: 1,
            title: "Part I".to_string(),
            target_page: 3,
        },
        OutlineEntry {
            level: 2,
            title: "Chapter 1".to_string(),
            target_page: 4,
        },
        OutlineEntry {
            level: 2,
            title: "Unresolved".to_string(),
            target_page: 0,
        },
        OutlineEntry {
            level: 1,
            title: "Appendix".to_string(),
            target_page: 2,
        },
    ];

    let candidates = detect_outline(&doc).expect("outline");
    let summary = candidates
        .iter()
        .map(|c| (c.title.as_str(), c.page_num, c.level, c.source))
        .collect::<Vec<_>>();
    assert_eq!(
        summary,
        vec![
            ("Part I", 3, 1, CandidateSource::EmbeddedOutline),
            ("Chapter 1", 4, 2, CandidateSource::EmbeddedOutline),
            ("Appendix", 2, 1, CandidateSource::EmbeddedOutline),
        ]
    );
}

#[test]
fn outline_detector_returns_empty_without_outline() {
    let doc = MemoryDocument::blank("book", 5);
    assert!(detect_outline(&doc).expect("outline").is_empty());
}

#[test]
fn toc_detector_reads_entries_from_keyword_pages() {
    let mut doc = MemoryDocument::blank("book", 20);
    doc.add_line(1, "目次", 16.0, 72.0, 60.0)
        .add_line(1, "第2章 基本 ……… 12", 10.0, 72.0, 100.0)
        .add_line(1, "第1章 はじめに ……… 5", 10.0, 72.0, 120.0)
        .add_line(1, "1. Getting Started ........ 8", 10.0, 72.0, 140.0)
        .add_line(1, "第3章 付録 ……… 99", 10.0, 72.0, 160.0)
        .add_line(1, "第4章 重複 ……… 5", 10.0, 72.0, 180.0)
        .add_line(1, "Preface 3", 10.0, 72.0, 200.0);
    // Same shape of line on a page without a TOC keyword is ignored.
    doc.add_line(6, "第5章 本文 ……… 15", 10.0, 72.0, 100.0);

    let candidates = detect_from_toc_pages(&doc, &TocParams::default()).expect("toc");
    let summary = candidates
        .iter()
        .map(|c| (c.title.as_str(), c.page_num))
        .collect::<Vec<_>>();
    assert_eq!(
        summary,
        vec![
            ("第1章 はじめに", 5),
            ("1. Getting Started", 8),
            ("第2章 基本", 12),
        ]
    );
    assert!(candidates
        .iter()
        .all(|c| c.level == 1 && c.source == CandidateSource::TocPage));
}

#[test]
fn toc_detector_only_scans_leading_pages() {
    let mut doc = MemoryDocument::blank("book", 40);
    doc.add_line(30, "Contents", 16.0, 72.0, 60.0)
        .add_line(30, "Chapter 1 Intro .... 35", 10.0, 72.0, 100.0);

    assert!(detect_from_toc_pages(&doc, &TocParams::default())
        .expect("toc")
        .is_empty());
    let wide = TocParams { max_scan_pages: 40 };
    assert_eq!(detect_from_toc_pages(&doc, &wide).expect("toc").len(), 1);
}

#[test]
fn body_size_prefers_character_mass_over_span_count() {
    let spans = vec![
        TextSpan {
            text: "A".to_string(),
            size: 30.0,
            font: "Display".to_string(),
            bbox: BBox::default(),
        },
        TextSpan {
            text: "B".to_string(),
            size: 30.0,
            font: "Display".to_string(),
            bbox: BBox::default(),
        },
        TextSpan {
            text: "long run of body text".to_string(),
            size: 10.04,
            font: "Serif".to_string(),
            bbox: BBox::default(),
        },
    ];
    assert_eq!(estimate_body_size(&spans), Some(10.0));
    assert_eq!(estimate_body_size(&spans[..0]), None);
}

#[test]
fn style_detector_enforces_min_page_gap() {
    let mut doc = body_document(10);
    doc.add_centered(2, "Chapter Heading", 14.0, 100.0);
    doc.add_centered(3, "Second Heading", 14.0, 100.0);

    let params = StyleParams {
        header_scale: 1.3,
        min_page_gap: 2,
        ..StyleParams::default()
    };
    let candidates = detect_by_style(&doc, &params).expect("style");
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].page_num, 3);
    assert_eq!(candidates[0].title, "Chapter Heading");
    assert_eq!(candidates[0].level, 1);
    assert_eq!(candidates[0].source, CandidateSource::StyleHeuristic);
}

#[test]
fn style_detector_ignores_low_small_and_long_lines() {
    let mut doc = body_document(6);
    doc.add_centered(1, "Too Low", 14.0, PAGE_HEIGHT * 0.7);
    doc.add_centered(2, "Barely Bigger", 11.0, 100.0);
    doc.add_centered(3, &"Long heading ".repeat(6), 14.0, 100.0);
    doc.add_centered(4, "X", 14.0, 100.0);

    let candidates = detect_by_style(&doc, &StyleParams::default()).expect("style");
    assert!(candidates.is_empty(), "unexpected {candidates:?}");
}

#[test]
fn style_detector_takes_first_qualifying_line_per_page() {
    let mut doc = body_document(4);
    doc.add_centered(1, "Main Title", 20.0, 80.0);
    doc.add_centered(1, "Subtitle", 16.0, 120.0);

    let candidates = detect_by_style(&doc, &StyleParams::default()).expect("style");
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].title, "Main Title");
}

#[test]
fn style_detector_finds_bare_chapter_opening_pages() {
    let mut doc = body_document(10);
    // Chapter-opening page holding only its title.
    doc.pages[4].blocks.clear();
    doc.raw_text[4].clear();
    doc.add_centered(4, "Chapter Two", 18.0, 100.0);

    let candidates = detect_by_style(&doc, &StyleParams::default()).expect("style");
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].page_num, 5);
    assert_eq!(candidates[0].title, "Chapter Two");

    let per_page = StyleParams {
        per_page_font: true,
        ..StyleParams::default()
    };
    assert!(detect_by_style(&doc, &per_page).expect("style").is_empty());
}

#[test]
fn style_detector_titles_come_from_the_large_span() {
    let mut doc = body_document(6);
    let span = |text: &str, size: f64, x0: f64| TextSpan {
        text: text.to_string(),
        size,
        font: "Serif".to_string(),
        bbox: BBox::new(x0, 100.0, x0 + size * 0.5 * text.chars().count() as f64, 100.0 + size),
    };
    doc.pages[2].blocks.push(Block {
        lines: vec![Line::from_spans(vec![
            span("Chapter Two ", 18.0, 200.0),
            span("37", 10.0, 520.0),
        ])],
    });
    doc.pages[4].blocks.push(Block {
        lines: vec![Line::from_spans(vec![
            span("A running header long enough to push the whole line past sixty", 9.0, 20.0),
            span("Chapter Three", 18.0, 320.0),
        ])],
    });

    let candidates = detect_by_style(&doc, &StyleParams::default()).expect("style");
    let found = candidates
        .iter()
        .map(|candidate| (candidate.page_num, candidate.title.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(found, vec![(3, "Chapter Two"), (5, "Chapter Three")]);
}

#[test]
fn pattern_detector_finds_centered_chapter_title() {
    let mut doc = body_document(15);
    doc.add_centered(11, "Chapter 3", 12.0, PAGE_HEIGHT * 0.3);

    let candidates = detect_by_pattern(&doc, &PatternParams::default()).expect("pattern");
    assert_eq!(
        candidates,
        vec![ChapterCandidate::new("Chapter 3", 12, 1, CandidateSource::Pattern)]
    );
}

#[test]
fn pattern_detector_skips_margins_and_lower_region() {
    let mut doc = body_document(6);
    doc.add_line(1, "Chapter 2", 12.0, 5.0, 100.0);
    doc.add_centered(3, "Chapter 4", 12.0, PAGE_HEIGHT * 0.6);

    let candidates = detect_by_pattern(&doc, &PatternParams::default()).expect("pattern");
    assert!(candidates.is_empty(), "unexpected {candidates:?}");
}

#[test]
fn pattern_detector_joins_word_spans_from_ocr() {
    let mut doc = body_document(4);
    let word = |text: &str, x0: f64| TextSpan {
        text: text.to_string(),
        size: 12.0,
        font: "GlyphLessFont".to_string(),
        bbox: BBox::new(x0, 150.0, x0 + 60.0, 162.0),
    };
    doc.pages[2].blocks.insert(
        0,
        Block {
            lines: vec![Line::from_spans(vec![word("7", 330.0), word("Chapter", 250.0)])],
        },
    );

    let candidates = detect_by_pattern(&doc, &PatternParams::default()).expect("pattern");
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].title, "Chapter 7");
    assert_eq!(candidates[0].page_num, 3);
}

#[test]
fn pattern_detector_applies_size_floor_and_gap() {
    let mut doc = body_document(8);
    doc.add_centered(1, "Chapter 1", 6.0, 100.0);
    doc.add_centered(3, "Chapter 2", 12.0, 100.0);
    doc.add_centered(4, "Chapter 2", 12.0, 100.0);

    let params = PatternParams {
        min_size_ratio: Some(0.8),
        ..PatternParams::default()
    };
    let candidates = detect_by_pattern(&doc, &params).expect("pattern");
    let pages = candidates.iter().map(|c| c.page_num).collect::<Vec<_>>();
    assert_eq!(pages, vec![4]);
}

#[test]
fn chain_prefers_outline_then_falls_back_in_order() {
    let mut doc = body_document(10);
    doc.add_centered(4, "Big Heading", 16.0, 100.0);

    let chain = DetectorChain::default();
    let outcome = chain.run(&doc).expect("chain");
    assert_eq!(outcome.strategy, Some("style"));
    assert_eq!(
        outcome.attempts,
        vec![("outline", 0), ("toc", 0), ("style", 1)]
    );

    doc.outline.push(OutlineEntry {
        level: 1,
        title: "Intro".to_string(),
        target_page: 1,
    });
    let outcome = chain.run(&doc).expect("chain");
    assert_eq!(outcome.strategy, Some("outline"));
    assert_eq!(outcome.candidates[0].title, "Intro");
}

#[test]
fn chain_reports_no_candidates_as_empty_outcome() {
    let doc = body_document(3);
    let outcome = DetectorChain::default().run(&doc).expect("chain");
    assert_eq!(outcome.strategy, None);
    assert!(outcome.candidates.is_empty());
    assert_eq!(outcome.attempts.len(), 4);
}

#[test]
fn detector_rerun_is_idempotent() {
    let mut doc = body_document(10);
    doc.add_centered(2, "Chapter 1", 16.0, 100.0);
    doc.add_centered(6, "Chapter 2", 16.0, 100.0);

    let detector = Detector::Pattern(PatternParams::default());
    let first = detector.detect(&doc).expect("first");
    let second = detector.detect(&doc).expect("second");
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[test]
fn filter_keeps_chapter_titles_sorted_by_page() {
    let input = vec![
        candidate("Chapter 2", 30),
        candidate("Figure 1", 12),
        candidate("Chapter 1", 10),
        candidate("第3章 応用", 50),
    ];

    let output = filter_major_chapters(&input, &FilterParams::default());
    let summary = output
        .iter()
        .map(|c| (c.title.as_str(), c.page_num))
        .collect::<Vec<_>>();
    assert_eq!(
        summary,
        vec![("Chapter 1", 10), ("Chapter 2", 30), ("第3章 応用", 50)]
    );
    assert!(output.iter().all(|kept| input.contains(kept)));
}

#[test]
fn filter_collapses_repeats_within_min_distance() {
    let input = vec![
        candidate("Chapter  1", 10),
        candidate("Chapter 1", 12),
        candidate("Chapter 1", 16),
        candidate("Chapter 2", 13),
    ];

    let output = filter_major_chapters(&input, &FilterParams::default());
    let pages = output.iter().map(|c| c.page_num).collect::<Vec<_>>();
    assert_eq!(pages, vec![10, 13, 16]);
}

#[test]
fn filter_is_idempotent() {
    let input = vec![
        candidate("Chapter 1", 1),
        candidate("Chapter 1", 3),
        candidate("Chapter 1", 7),
        candidate("Chapter 1", 9),
        candidate("Chapter 1", 12),
        candidate("Appendix", 20),
    ];
    let params = FilterParams {
        keyword: Some("appendix".to_string()),
        ..FilterParams::default()
    };

    let once = filter_major_chapters(&input, &params);
    let twice = filter_major_chapters(&once, &params);
    assert_eq!(once, twice);
    let pages = once.iter().map(|c| c.page_num).collect::<Vec<_>>();
    assert_eq!(pages, vec![1, 7, 12, 20]);
}

#[test]
fn filter_honours_active_groups_and_keyword() {
    let input = vec![
        candidate("Chapter 1", 1),
        candidate("第2章", 10),
        candidate("Glossary", 20),
    ];
    let params = FilterParams {
        active_groups: Some(vec!["ja_chapter".to_string()]),
        keyword: Some("gloss".to_string()),
        min_distance: 5,
    };

    let output = filter_major_chapters(&input, &params);
    let titles = output.iter().map(|c| c.title.as_str()).collect::<Vec<_>>();
    assert_eq!(titles, vec!["第2章", "Glossary"]);
}

#[test]
fn filter_leaves_title_level_and_page_untouched() {
    let mut input = ChapterCandidate::new("  Chapter 9 ", 4, 3, CandidateSource::User);
    input.selected = false;
    let output = filter_major_chapters(&[input.clone()], &FilterParams::default());
    assert_eq!(output, vec![input]);
}

#[test]
fn suggestion_lists_matched_groups_or_defaults_to_all() {
    let input = vec![
        candidate("Part 1", 1),
        candidate("Chapter 1", 2),
        candidate("Notes", 3),
    ];
    assert_eq!(suggest_pattern_group_ids(&input), vec!["en_chapter", "en_part"]);

    let all = patterns::group_ids()
        .into_iter()
        .map(str::to_string)
        .collect::<Vec<String>>();
    assert_eq!(suggest_pattern_group_ids(&[]), all);
    assert_eq!(suggest_pattern_group_ids(&[candidate("Notes", 3)]), all);
}
