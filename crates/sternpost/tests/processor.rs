//! Render-once container lifecycle through the processor

mod common;

use common::{dark, light, FakeRenderer, RecordingTimer};
use futures::executor::block_on;
use sternpost::core::{ColorMode, NoDelay, ProcessorConfig, RenderError};
use sternpost::pipeline::{
    Container, Content, Layout, Page, Processor, RenderOutcome, RenderState, SkipReason,
    ERROR_HEADING,
};

fn fast(renderer: FakeRenderer, theme: sternpost::core::ThemeState) -> Processor<FakeRenderer, NoDelay> {
    Processor::new(renderer, NoDelay, theme).with_config(ProcessorConfig::without_delays())
}

fn text_fills(container: &Container) -> Vec<Option<String>> {
    let mut fills = Vec::new();
    container.visual().unwrap().walk(&mut |_, el| {
        if el.is("text") || el.is("tspan") {
            fills.push(el.style_property("fill"));
        }
    });
    fills
}

#[test]
fn test_flowchart_light_mode_has_no_dark_overrides() {
    let mut processor = fast(FakeRenderer::fixtures(), light());
    let mut page: Page = [Container::new("flowchart TD\nA-->B")].into_iter().collect();

    let summary = block_on(processor.start(&mut page)).unwrap();
    assert_eq!(summary.rendered, 1);

    let container = page.get(0).unwrap();
    assert_eq!(container.state(), RenderState::Rendered);
    assert!(container.is_processed());
    let markup = container.markup();
    assert!(!markup.contains("data-cutout"));
    assert!(!markup.contains("#f1f5f9"));
    assert!(text_fills(container)
        .iter()
        .all(|fill| fill.as_deref() == Some("#1e293b")));
}

#[test]
fn test_theme_toggle_restores_text_and_renders_again() {
    let theme = light();
    let mut processor = fast(FakeRenderer::fixtures(), theme.clone());
    let mut page: Page = [Container::new("flowchart TD\nA-->B")].into_iter().collect();
    block_on(processor.start(&mut page)).unwrap();
    assert_eq!(processor.renderer().call_count(), 1);

    let summary = block_on(processor.change_mode(&mut page, ColorMode::Dark)).unwrap();
    assert_eq!(summary.rendered, 1);
    assert_eq!(theme.mode(), ColorMode::Dark);

    let calls = processor.renderer().calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].1, "flowchart TD\nA-->B");
    let configs = processor.renderer().configs();
    assert_eq!(configs.len(), 2);
    assert!(!configs[0].theme_variables.dark_mode);
    assert!(configs[1].theme_variables.dark_mode);

    let fills = text_fills(page.get(0).unwrap());
    assert!(!fills.is_empty());
    assert!(fills.iter().all(|fill| fill.as_deref() == Some("#f1f5f9")));
}

#[test]
fn test_decision_shape_rescaled_after_render() {
    let mut processor = fast(FakeRenderer::fixtures(), light());
    let mut page: Page = [Container::new("flowchart TD\nA{Ok?}-->B")].into_iter().collect();
    block_on(processor.start(&mut page)).unwrap();

    let mut transform = None;
    page.get(0).unwrap().visual().unwrap().walk(&mut |_, el| {
        if el.is("polygon") {
            transform = el.attr("transform").map(str::to_string);
        }
    });
    let transform = transform.unwrap();
    assert!(transform.starts_with("translate(100, 50)"));
    assert!(transform.contains("scale(0.6666"));
}

#[test]
fn test_collaborator_rejection_shows_error_display() {
    let mut processor = fast(
        FakeRenderer::failing("Parse error on line 2: Expecting 'SQE', got 'LINK'"),
        light(),
    );
    let mut container = Container::new("flowchart TD\nA--> -->B");
    processor.initialize().unwrap();

    let outcome = block_on(processor.render(&mut container));
    assert!(matches!(outcome, RenderOutcome::Failed { ref message, .. } if message.contains("Parse error")));
    assert_eq!(container.state(), RenderState::Errored);
    assert!(!container.is_processed());

    let Content::Error(html) = container.content() else {
        panic!("expected an error display, got {:?}", container.content());
    };
    assert!(html.contains(ERROR_HEADING));
    assert!(html.contains("Parse error on line 2: Expecting 'SQE', got 'LINK'"));
}

#[test]
fn test_errored_container_waits_for_reset() {
    let mut processor = fast(FakeRenderer::failing("bad"), dark());
    let mut page: Page = [Container::new("flowchart TD\nA-->B")].into_iter().collect();
    block_on(processor.start(&mut page)).unwrap();

    let again = block_on(processor.render_all(&mut page));
    assert_eq!(again.skipped, 1);
    assert_eq!(processor.renderer().call_count(), 1);

    assert_eq!(processor.reset_all(&mut page), 1);
    assert_eq!(
        page.get(0).unwrap().source_text(),
        Some("flowchart TD\nA-->B")
    );
}

#[test]
fn test_unparseable_markup_is_an_error() {
    let mut processor = fast(FakeRenderer::with(|_| Ok("<svg><g></svg>".into())), light());
    let mut container = Container::new("flowchart TD\nA-->B");
    processor.initialize().unwrap();
    let outcome = block_on(processor.render(&mut container));
    assert!(matches!(outcome, RenderOutcome::Failed { .. }));
    assert!(container.markup().contains("Markup error"));
}

#[test]
fn test_short_text_is_a_noop() {
    let mut processor = fast(FakeRenderer::fixtures(), light());
    processor.initialize().unwrap();

    for text in ["", "graph", "   A-->B   ", "graph TD;"] {
        let mut container = Container::new(text);
        let outcome = block_on(processor.render(&mut container));
        assert_eq!(outcome, RenderOutcome::Skipped(SkipReason::TooShort), "{text:?}");
        assert_eq!(container.source_text(), Some(text));
        assert!(container.original().is_none());
    }
    assert_eq!(processor.renderer().call_count(), 0);

    let mut exactly_ten = Container::new("graph TD;A");
    assert!(matches!(
        block_on(processor.render(&mut exactly_ten)),
        RenderOutcome::Rendered { .. }
    ));
}

#[test]
fn test_processed_container_is_not_rendered_twice() {
    let mut processor = fast(FakeRenderer::fixtures(), light());
    processor.initialize().unwrap();
    let mut container = Container::new("flowchart TD\nA-->B");

    block_on(processor.render(&mut container));
    let second = block_on(processor.render(&mut container));
    assert_eq!(second, RenderOutcome::Skipped(SkipReason::AlreadyRendered));
    assert_eq!(processor.renderer().call_count(), 1);
}

#[test]
fn test_visual_source_is_left_alone() {
    let mut processor = fast(FakeRenderer::fixtures(), light());
    processor.initialize().unwrap();
    let mut container = Container::new("<svg><text>prerendered</text></svg>");
    assert_eq!(
        block_on(processor.render(&mut container)),
        RenderOutcome::Skipped(SkipReason::AlreadyRendered)
    );
    assert_eq!(processor.renderer().call_count(), 0);
}

#[test]
fn test_hidden_container_renders_once_visible() {
    let mut processor = fast(FakeRenderer::fixtures(), light());
    processor.initialize().unwrap();
    let mut container = Container::new("flowchart TD\nA-->B").with_layout(Layout::hidden());

    assert_eq!(
        block_on(processor.render(&mut container)),
        RenderOutcome::Skipped(SkipReason::NotVisible)
    );
    assert_eq!(container.state(), RenderState::Unrendered);

    container.set_layout(Layout::new(640.0, 480.0));
    assert!(matches!(
        block_on(processor.render(&mut container)),
        RenderOutcome::Rendered { .. }
    ));
}

#[test]
fn test_reset_all_requires_initialize_again() {
    let mut processor = fast(FakeRenderer::fixtures(), light());
    let mut page: Page = [
        Container::new("flowchart TD\nA-->B"),
        Container::new("x"),
    ]
    .into_iter()
    .collect();
    block_on(processor.start(&mut page)).unwrap();

    assert_eq!(processor.reset_all(&mut page), 1);
    assert!(!processor.is_initialized());
    let mut container = Container::new("flowchart TD\nC-->D");
    assert_eq!(
        block_on(processor.render(&mut container)),
        RenderOutcome::Skipped(SkipReason::NotInitialized)
    );
}

#[test]
fn test_generated_ids_are_fresh() {
    let mut processor = fast(FakeRenderer::fixtures(), light());
    let mut page: Page = (0..5)
        .map(|i| Container::new(format!("flowchart TD\nA{i}-->B")))
        .chain([Container::new("flowchart TD\nX-->Y").with_id("named")])
        .collect();
    block_on(processor.start(&mut page)).unwrap();

    let ids: Vec<String> = processor.renderer().calls().into_iter().map(|(id, _)| id).collect();
    assert_eq!(ids.len(), 6);
    assert_eq!(ids[5], "named");
    let unique: std::collections::HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), 6);
    assert!(ids[..5].iter().all(|id| id.starts_with("mermaid-")));
}

#[test]
fn test_mode_read_after_render_completes() {
    let theme = light();
    let renderer = FakeRenderer::fixtures().flipping(theme.clone());
    let mut processor = fast(renderer, theme.clone());
    let mut page: Page = [Container::new("sequenceDiagram\nAlice->>Bob: Hello")]
        .into_iter()
        .collect();
    processor.initialize().unwrap();
    block_on(processor.render_all(&mut page));

    assert_eq!(theme.mode(), ColorMode::Dark);
    let markup = page.get(0).unwrap().markup();
    assert!(markup.contains("data-cutout=\"true\""));
    assert!(markup.contains("#f1f5f9"));
}

#[test]
fn test_render_all_delays_in_order() {
    let timer = RecordingTimer::new();
    let mut processor = Processor::new(FakeRenderer::fixtures(), timer.clone(), light());
    let mut page: Page = [
        Container::new("flowchart TD\nA-->B"),
        Container::new("sequenceDiagram\nA->>B: hi"),
    ]
    .into_iter()
    .collect();

    block_on(processor.start(&mut page)).unwrap();
    assert_eq!(timer.millis(), vec![100, 100, 100, 500]);
}

#[test]
fn test_settle_pass_follows_late_theme_change() {
    let theme = light();
    let mut processor = fast(FakeRenderer::fixtures(), theme.clone());
    let mut page: Page = [Container::new("sequenceDiagram\nAlice->>Bob: Hello")]
        .into_iter()
        .collect();
    block_on(processor.start(&mut page)).unwrap();
    assert!(!page.get(0).unwrap().markup().contains("data-cutout"));

    theme.set(ColorMode::Dark);
    assert!(processor.reapply_palette(&mut page) > 0);
    let first = page.get(0).unwrap().markup();
    assert!(first.contains("data-cutout"));

    processor.reapply_palette(&mut page);
    assert_eq!(page.get(0).unwrap().markup(), first);
}

#[test]
fn test_recovery_on_diagram_errors() {
    let timer = RecordingTimer::new();
    let mut processor = Processor::new(FakeRenderer::fixtures(), timer.clone(), light())
        .with_config(ProcessorConfig::default().with_settle_delays(Vec::new()));
    let mut page: Page = [Container::new("flowchart TD\nA-->B")].into_iter().collect();
    block_on(processor.start(&mut page)).unwrap();
    assert_eq!(timer.millis(), vec![100]);

    let recovered =
        block_on(processor.handle_uncaught_error(&mut page, "MermaidError: bad state")).unwrap();
    assert!(recovered);
    assert_eq!(timer.millis(), vec![100, 1000, 100, 100]);
    assert_eq!(processor.renderer().call_count(), 2);
    assert!(page.get(0).unwrap().is_processed());
}

#[test]
fn test_unrelated_errors_do_not_recover() {
    let timer = RecordingTimer::new();
    let mut processor = Processor::new(FakeRenderer::fixtures(), timer.clone(), light());
    let mut page = Page::new();
    let recovered =
        block_on(processor.handle_uncaught_error(&mut page, "TypeError: nav is null")).unwrap();
    assert!(!recovered);
    assert!(timer.millis().is_empty());
    assert!(processor.renderer().configs().is_empty());
}

#[test]
fn test_unavailable_renderer_message_is_shown() {
    let mut processor = fast(
        FakeRenderer::with(|_| Err(RenderError::unavailable("mmdc not found"))),
        dark(),
    );
    let mut page: Page = [Container::new("flowchart TD\nA-->B")].into_iter().collect();
    let summary = block_on(processor.start(&mut page)).unwrap();
    assert_eq!(summary.failed, 1);
    let markup = page.get(0).unwrap().markup();
    assert!(markup.contains("mmdc not found"));
    assert!(markup.contains("#f87171"));
}
