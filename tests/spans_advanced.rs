use spindex::config::IndexSettings;
use spindex::index::{IndexReader, Term};
use spindex::query::{
    execute, BoolQuery, QueryContext, Searcher, SpanQuery, SpanTermQuery, Spans, TermQuery,
};
use spindex::testing::hit_ids;
use spindex::testing::prelude::*;
use spindex::{DocId, NormEncoding, SpindexError};

fn reader() -> IndexReader {
    spindex::logging::init_with_level("debug");
    spans_advanced_corpus().unwrap().reader().unwrap()
}

#[test]
fn golden_index_has_eight_documents() {
    let reader = reader();
    assert_eq!(reader.num_docs().unwrap(), 8);
    assert_eq!(reader.max_doc().unwrap(), 8);
    assert_eq!(reader.generation().unwrap(), 2);
    assert_eq!(reader.doc_freq(&Term::new(FIELD_TEXT, "should")).unwrap(), 7);
    assert_eq!(reader.doc_freq(&Term::new(FIELD_TEXT, "we")).unwrap(), 2);
}

#[test]
fn golden_single_span_query() {
    let reader = reader();
    let hits = execute(&SpanTermQuery::new(FIELD_TEXT, "should"), &reader, 10).unwrap();

    assert_hits(
        &reader,
        &hits,
        &["B", "D", "1", "2", "3", "4", "A"],
        &[1.0, 0.70710677, 0.5, 0.5, 0.5, 0.5, 0.4082483],
    );
}

#[test]
fn golden_span_and_term_queries_agree() {
    let reader = reader();
    let span = execute(&SpanTermQuery::new(FIELD_TEXT, "should"), &reader, 10).unwrap();
    let term = execute(&TermQuery::new(FIELD_TEXT, "should"), &reader, 10).unwrap();
    assert_eq!(span, term);
}

#[test]
fn golden_shouldnt_is_one_token() {
    let reader = reader();
    let hits = execute(&SpanTermQuery::new(FIELD_TEXT, "shouldn't"), &reader, 10).unwrap();
    assert_hits(&reader, &hits, &["C"], &[1.0]);
}

#[test]
fn golden_must_should_and_we() {
    let reader = reader();
    let query = BoolQuery::new()
        .must(SpanTermQuery::new(FIELD_TEXT, "should"))
        .must(SpanTermQuery::new(FIELD_TEXT, "we"));
    let hits = execute(&query, &reader, 10).unwrap();

    assert_hits(&reader, &hits, &["D", "A"], &[0.949897, 0.815212]);
}

#[test]
fn golden_should_should_or_we() {
    let reader = reader();
    let query = BoolQuery::new()
        .should(SpanTermQuery::new(FIELD_TEXT, "should"))
        .should(SpanTermQuery::new(FIELD_TEXT, "we"));
    let hits = execute(&query, &reader, 10).unwrap();

    assert_hits(
        &reader,
        &hits,
        &["D", "A", "B", "1", "2", "3", "4"],
        &[0.949897, 0.815212, 0.225333, 0.112667, 0.112667, 0.112667, 0.112667],
    );
}

#[test]
fn golden_must_not_excludes_we() {
    let reader = reader();
    let query = BoolQuery::new()
        .should(SpanTermQuery::new(FIELD_TEXT, "should"))
        .must_not(SpanTermQuery::new(FIELD_TEXT, "we"));
    let hits = execute(&query, &reader, 10).unwrap();

    // MUST_NOT leaves stay out of the query norm, so the scores match the
    // plain "should" query
    assert_hits(
        &reader,
        &hits,
        &["B", "1", "2", "3", "4"],
        &[1.0, 0.5, 0.5, 0.5, 0.5],
    );
}

#[test]
fn golden_repeated_work_query() {
    let query = BoolQuery::new()
        .must(SpanTermQuery::new(FIELD_TEXT, "work"))
        .must(SpanTermQuery::new(FIELD_TEXT, "work"));

    let baseline = baseline_corpus().unwrap();
    let four = baseline.reader().unwrap();
    let hits = execute(&query, &four, 10).unwrap();
    assert_hits(&four, &hits, &["1", "2", "3", "4"], &[0.70710677; 4]);

    let eight = baseline.spans_advanced().unwrap().reader().unwrap();
    let hits = execute(&query, &eight, 10).unwrap();
    assert_hits(&eight, &hits, &["1", "2", "3", "4"], &[0.70710677; 4]);

    // the 4-doc reader still sees its own snapshot
    assert_eq!(four.num_docs().unwrap(), 4);
}

#[test]
fn golden_empty_boolean_query() {
    let reader = reader();
    assert!(matches!(
        execute(&BoolQuery::new(), &reader, 10),
        Err(SpindexError::EmptyQuery)
    ));

    let nested = BoolQuery::new()
        .must(SpanTermQuery::new(FIELD_TEXT, "should"))
        .must(BoolQuery::new().must_not(SpanTermQuery::new(FIELD_TEXT, "we")));
    assert!(matches!(
        execute(&nested, &reader, 10),
        Err(SpindexError::EmptyQuery)
    ));
}

#[test]
fn golden_nested_boolean() {
    let reader = reader();
    let either = BoolQuery::new()
        .should(SpanTermQuery::new(FIELD_TEXT, "could"))
        .should(SpanTermQuery::new(FIELD_TEXT, "think"));
    let query = BoolQuery::new()
        .must(SpanTermQuery::new(FIELD_TEXT, "should"))
        .must(either);
    let hits = execute(&query, &reader, 10).unwrap();

    let mut ids = hit_ids(&reader, &hits).unwrap();
    ids.sort();
    assert_eq!(ids, vec!["1", "2", "3", "4", "A"]);
}

#[test]
fn golden_spans_for_d() {
    let reader = reader();
    let searcher = Searcher::new(&reader);
    let ctx = QueryContext::new(&reader, searcher.similarity());

    let query = SpanTermQuery::new(FIELD_TEXT, "should");
    let mut spans = query.spans(&ctx).unwrap().unwrap();
    let first_in_d = spans.skip_to(DocId(7)).unwrap();
    assert_eq!((first_in_d.start, first_in_d.end), (0, 1));

    let mut starts = vec![first_in_d.start];
    while let Some(span) = spans.next_span() {
        assert_eq!(span.doc, DocId(7));
        starts.push(span.start);
    }
    assert_eq!(starts, vec![0, 2, 4]);
}

#[test]
fn golden_single_byte_norms() {
    let settings = IndexSettings::default().with_norm_encoding(NormEncoding::SingleByte);
    let corpus = CorpusBuilder::with_settings(settings)
        .baseline()
        .unwrap()
        .spans_advanced()
        .unwrap();
    let reader = corpus.reader().unwrap();
    let hits = execute(&SpanTermQuery::new(FIELD_TEXT, "should"), &reader, 10).unwrap();

    // norms quantize to 0.625 (len 2), 0.375 (len 6) and 0.5 (len 4)
    let sqrt3 = 3f32.sqrt();
    assert_hits(
        &reader,
        &hits,
        &["B", "D", "1", "2", "3", "4", "A"],
        &[
            2f32.sqrt() * 0.625,
            sqrt3 * 0.375,
            0.5,
            0.5,
            0.5,
            0.5,
            0.375,
        ],
    );
}

#[test]
fn golden_scenarios_pass() {
    for outcome in span_scenarios(7).run_all() {
        assert!(outcome.passed(), "{outcome}");
    }
}
