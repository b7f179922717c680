//! Page composition
//!
//! Builds the portfolio document as an [`ElementTree`] from [`Content`],
//! lays out the document-space bounds the interaction widgets need, and
//! resolves the anchors the app context mutates afterwards.

use crate::config::SiteConfig;
use crate::content::{CardRecord, CardVisual, Content, LayoutSpan, ProjectRecord, Technology};
use crate::icons::Icon;
use folio_core::{Rect, Size};
use folio_layout::{div, el, ElementBuilder, ElementTree, NodeId};
use folio_theme::ColorScheme;
use std::time::{SystemTime, UNIX_EPOCH};

pub const HEADER_HEIGHT: f32 = 80.0;
const MAX_CONTENT_WIDTH: f32 = 1100.0;
const SIDE_PADDING: f32 = 24.0;
const HERO_HEIGHT: f32 = 640.0;
const SECTION_TITLE_HEIGHT: f32 = 120.0;
const DECK_HEIGHT: f32 = 560.0;
const TECH_HEIGHT: f32 = 320.0;
const FOOTER_HEIGHT: f32 = 160.0;
const BENTO_ROW_HEIGHT: f32 = 220.0;
const BENTO_GAP: f32 = 24.0;
/// Below this width the bento grid collapses to one column
const NARROW_BREAKPOINT: f32 = 768.0;

pub const CARD_SIZE: Size = Size::new(300.0, 400.0);

/// Marquee item footprint, used for the loop distance
pub const TECH_ITEM_WIDTH: f32 = 120.0;
pub const TECH_ITEM_GAP: f32 = 48.0;

/// Scroll offset past which the header is marked `scrolled`
pub const HEADER_SCROLL_THRESHOLD: f32 = 10.0;

/// Sections that fade in once revealed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Section {
    Hero,
    Work,
    Tech,
    Projects,
}

impl Section {
    pub const ALL: [Section; 4] = [Section::Hero, Section::Work, Section::Tech, Section::Projects];

    pub fn element_id(self) -> &'static str {
        match self {
            Section::Hero => "hero",
            Section::Work => "work",
            Section::Tech => "tech",
            Section::Projects => "projects",
        }
    }

    pub fn from_element_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.element_id() == id)
    }

    /// Visible fraction that reveals the section
    pub fn threshold(self) -> f32 {
        match self {
            Section::Work => 0.2,
            Section::Hero | Section::Tech | Section::Projects => 0.1,
        }
    }
}

/// Document-space bounds of everything the widgets hit-test or observe
#[derive(Clone, Debug, PartialEq)]
pub struct PageLayout {
    pub header: Rect,
    pub hero: Rect,
    pub work: Rect,
    /// The deck container inside `work`
    pub deck: Rect,
    /// Shared bounds of every stacked card
    pub card: Rect,
    pub tech: Rect,
    pub projects: Rect,
    pub bento: Vec<Rect>,
    pub footer: Rect,
    pub document_height: f32,
}

impl PageLayout {
    /// Stack the sections top to bottom for a viewport `width` wide
    pub fn compute(width: f32, spans: &[LayoutSpan]) -> Self {
        let content_width = (width - 2.0 * SIDE_PADDING).min(MAX_CONTENT_WIDTH).max(0.0);
        let x = ((width - content_width) / 2.0).max(0.0);
        let header = Rect::new(0.0, 0.0, width, HEADER_HEIGHT);

        let mut y = HEADER_HEIGHT;
        let mut section = |height: f32| {
            let rect = Rect::new(x, y, content_width, height);
            y += height;
            rect
        };

        let hero = section(HERO_HEIGHT);
        let work = section(SECTION_TITLE_HEIGHT + DECK_HEIGHT);
        let tech = section(TECH_HEIGHT);

        let columns = if width < NARROW_BREAKPOINT { 1 } else { 3 };
        let (bento, rows) = bento_cells(spans, columns, x, content_width);
        let grid_height = if rows == 0 {
            0.0
        } else {
            rows as f32 * BENTO_ROW_HEIGHT + (rows - 1) as f32 * BENTO_GAP
        };
        let projects = section(SECTION_TITLE_HEIGHT + grid_height);
        let footer = section(FOOTER_HEIGHT);

        let grid_top = projects.y() + SECTION_TITLE_HEIGHT;
        let bento = bento.into_iter().map(|cell| cell.offset(0.0, grid_top)).collect();

        let deck = Rect::new(x, work.y() + SECTION_TITLE_HEIGHT, content_width, DECK_HEIGHT);
        let card_width = CARD_SIZE.width.min(content_width);
        let card = Rect::new(
            deck.x() + (deck.width() - card_width) / 2.0,
            deck.y() + (deck.height() - CARD_SIZE.height) / 2.0,
            card_width,
            CARD_SIZE.height,
        );

        Self {
            header,
            hero,
            work,
            deck,
            card,
            tech,
            projects,
            bento,
            footer,
            document_height: footer.bottom(),
        }
    }

    pub fn section(&self, section: Section) -> Rect {
        match section {
            Section::Hero => self.hero,
            Section::Work => self.work,
            Section::Tech => self.tech,
            Section::Projects => self.projects,
        }
    }
}

/// Row-major placement; a span that does not fit wraps to the next row.
/// Cells are relative to the grid top.
fn bento_cells(spans: &[LayoutSpan], columns: usize, x: f32, width: f32) -> (Vec<Rect>, usize) {
    let cell = (width - BENTO_GAP * (columns - 1) as f32) / columns as f32;
    let mut cells = Vec::with_capacity(spans.len());
    let (mut row, mut col) = (0usize, 0usize);

    for span in spans {
        let span = span.columns().min(columns);
        if col + span > columns {
            row += 1;
            col = 0;
        }
        cells.push(Rect::new(
            x + col as f32 * (cell + BENTO_GAP),
            row as f32 * (BENTO_ROW_HEIGHT + BENTO_GAP),
            cell * span as f32 + BENTO_GAP * (span - 1) as f32,
            BENTO_ROW_HEIGHT,
        ));
        col += span;
    }

    let rows = if cells.is_empty() { 0 } else { row + 1 };
    (cells, rows)
}

/// The two nodes of one deck card
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardAnchor {
    pub index: usize,
    /// Outer wrapper carrying the translation
    pub wrapper: NodeId,
    /// Inner card carrying rotation and scale
    pub card: NodeId,
}

/// Nodes the app context reads and mutates after composition
#[derive(Clone, Debug, Default)]
pub struct Anchors {
    pub body: Option<NodeId>,
    pub header: Option<NodeId>,
    pub theme_toggle: Option<NodeId>,
    pub sections: Vec<(Section, NodeId)>,
    pub deck_cards: Vec<CardAnchor>,
    pub scroller: Option<NodeId>,
    pub scroller_row: Option<NodeId>,
    /// Bento cards keyed by project index
    pub projects: Vec<(usize, NodeId)>,
}

impl Anchors {
    fn resolve(tree: &ElementTree, cards: usize, projects: usize) -> Self {
        let scroller = tree.find_by_id("tech-scroller");
        Self {
            body: tree.root(),
            header: tree.find_by_id("header"),
            theme_toggle: tree.find_by_id("theme-toggle"),
            sections: Section::ALL
                .into_iter()
                .filter_map(|s| tree.find_by_id(s.element_id()).map(|id| (s, id)))
                .collect(),
            deck_cards: (0..cards)
                .filter_map(|index| {
                    let card = tree.find_by_id(&deck_card_id(index))?;
                    let wrapper = tree.parent(card)?;
                    Some(CardAnchor {
                        index,
                        wrapper,
                        card,
                    })
                })
                .collect(),
            scroller,
            scroller_row: scroller.and_then(|s| tree.first_by_class(s, "tech-scroller-inner")),
            projects: (0..projects)
                .filter_map(|i| tree.find_by_id(&project_id(i)).map(|id| (i, id)))
                .collect(),
        }
    }

    pub fn section(&self, section: Section) -> Option<NodeId> {
        self.sections
            .iter()
            .find(|(s, _)| *s == section)
            .map(|(_, id)| *id)
    }

    pub fn project(&self, index: usize) -> Option<NodeId> {
        self.projects
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, id)| *id)
    }
}

pub fn deck_card_id(index: usize) -> String {
    format!("deck-card-{index}")
}

pub fn project_id(index: usize) -> String {
    format!("project-{index}")
}

/// The composed document
#[derive(Clone, Debug)]
pub struct Page {
    pub tree: ElementTree,
    pub anchors: Anchors,
    pub layout: PageLayout,
}

impl Page {
    pub fn build(
        content: &Content,
        site: &SiteConfig,
        layout: PageLayout,
        scheme: ColorScheme,
        year: i32,
    ) -> Self {
        let body = el("body").class(scheme.class_name()).child(
            div()
                .class("app-container")
                .child(header(site, scheme, &layout))
                .child(
                    el("main")
                        .class("main-content")
                        .child(hero(content, &layout))
                        .child(work(&content.cards, &layout))
                        .child(tech(&content.technologies, &layout))
                        .child(projects(&content.projects, &layout)),
                )
                .child(footer(content, year, &layout)),
        );

        let tree = ElementTree::from_root(body);
        let anchors = Anchors::resolve(&tree, content.cards.len(), content.projects.len());
        tracing::debug!(nodes = tree.len(), "page composed");
        Self {
            tree,
            anchors,
            layout,
        }
    }

    /// Recompute bounds for a new viewport width and write them back
    pub fn relayout(&mut self, width: f32, spans: &[LayoutSpan]) {
        let layout = PageLayout::compute(width, spans);
        let tree = &mut self.tree;
        if let Some(header) = self.anchors.header {
            tree.set_bounds(header, layout.header);
        }
        for (section, node) in &self.anchors.sections {
            tree.set_bounds(*node, layout.section(*section));
        }
        for anchor in &self.anchors.deck_cards {
            tree.set_bounds(anchor.wrapper, layout.card);
            tree.set_bounds(anchor.card, layout.card);
        }
        for (index, node) in &self.anchors.projects {
            if let Some(bounds) = layout.bento.get(*index) {
                tree.set_bounds(*node, *bounds);
            }
        }
        tracing::debug!(width, height = layout.document_height, "page relayout");
        self.layout = layout;
    }

    /// Body markup only
    pub fn render_body(&self) -> String {
        self.tree
            .root()
            .map(|root| self.tree.render_html(root))
            .unwrap_or_default()
    }

    /// Complete HTML document
    pub fn render_document(&self, title: &str) -> String {
        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
             <title>{}</title>\n</head>\n{}\n</html>\n",
            html_escape::encode_text(title),
            self.render_body()
        )
    }
}

fn header(site: &SiteConfig, scheme: ColorScheme, layout: &PageLayout) -> ElementBuilder {
    let logo = el("img")
        .attr("src", site.logo.as_str())
        .attr("alt", "Site Logo")
        .attr("width", "50")
        .attr("height", "50")
        .style("border-radius", "6px");

    el("header").id("header").class("app-header").bounds(layout.header).child(
        div()
            .class("header-inner")
            .child(
                el("a")
                    .attr("href", "#")
                    .class("header-logo-link")
                    .attr("aria-label", "Home")
                    .child(logo),
            )
            .child(
                el("nav")
                    .class("header-nav")
                    .child(el("a").attr("href", "#work").class("header-link").text("WORK"))
                    .child(el("a").attr("href", "#projects").class("header-link").text("PROJECTS"))
                    .child(theme_toggle(scheme)),
            ),
    )
}

pub fn toggle_label(scheme: ColorScheme) -> String {
    format!("Switch to {} mode", scheme.toggle())
}

fn theme_toggle(scheme: ColorScheme) -> ElementBuilder {
    el("button")
        .id("theme-toggle")
        .class("animated-theme-toggle")
        .attr("data-theme", scheme.as_str())
        .attr("aria-label", toggle_label(scheme))
        .child(
            div()
                .class("icons-wrapper")
                .child(div().class("icon").text("\u{2600}\u{fe0f}"))
                .child(div().class("icon").text("\u{1f319}")),
        )
}

fn hero(content: &Content, layout: &PageLayout) -> ElementBuilder {
    let profile = &content.profile;
    let contacts = content.contacts.iter().map(|link| {
        let anchor = el("a").attr("href", link.href.as_str());
        let anchor = if link.external {
            anchor.attr("target", "_blank").attr("rel", "noopener noreferrer")
        } else {
            anchor
        };
        anchor
            .class("contact-icon-link")
            .attr("aria-label", link.label.as_str())
            .child(link.icon.element())
    });

    el("section")
        .id(Section::Hero.element_id())
        .class("hero-section animated-section")
        .bounds(layout.hero)
        .child(el("p").class("hero-greeting").text(profile.greeting.as_str()))
        .child(
            el("h1")
                .class("hero-main-heading")
                .child(el("span").class("gradient-text").text(profile.name.as_str()))
                .child(el("br"))
                .text(profile.tagline.as_str()),
        )
        .child(el("p").class("hero-description").text(profile.description.as_str()))
        .child(div().id("contact").class("contact-info-container").children(contacts))
}

fn work(cards: &[CardRecord], layout: &PageLayout) -> ElementBuilder {
    el("section")
        .id(Section::Work.element_id())
        .class("content-section animated-section")
        .bounds(layout.work)
        .child(el("h2").class("section-title").text("What I Do"))
        .child(
            div()
                .id("deck")
                .class("deck-container")
                .bounds(layout.deck)
                .children(cards.iter().enumerate().map(|(i, card)| deck_card(i, card, layout.card))),
        )
}

fn deck_card(index: usize, card: &CardRecord, bounds: Rect) -> ElementBuilder {
    div()
        .class("deck")
        .attr("data-index", index.to_string())
        .bounds(bounds)
        .child(
            div()
                .id(deck_card_id(index))
                .class("deck-card-container")
                .bounds(bounds)
                .child(
                    div()
                        .class("card-content")
                        .child(div().class("card-icon").child(card_visual(&card.visual)))
                        .child(el("h2").class("card-title").text(card.title.as_str()))
                        .child(el("p").class("card-paragraph").text(card.text.as_str())),
                ),
        )
}

fn card_visual(visual: &CardVisual) -> ElementBuilder {
    match visual {
        CardVisual::Icon(icon) => icon.element(),
        CardVisual::Logo { src, alt } => div().class("company-logo-wrapper").child(
            el("img")
                .attr("src", src.as_str())
                .attr("alt", alt.as_str())
                .class("company-logo"),
        ),
        CardVisual::Wordmark(text) => div().class("company-logo-wrapper").child(
            div()
                .class("hahaho-logo-placeholder")
                .child(el("span").text(text.as_str())),
        ),
    }
}

fn tech(technologies: &[Technology], layout: &PageLayout) -> ElementBuilder {
    let items = technologies.iter().map(|tech| {
        let logo = el("img")
            .attr("src", tech.logo.as_str())
            .attr("alt", format!("{} Logo", tech.name))
            .attr("loading", "lazy")
            .class("tech-logo-img");
        let logo = match &tech.class {
            Some(class) => logo.class(class),
            None => logo,
        };
        div()
            .class("tech-item")
            .child(div().class("tech-logo").child(logo))
            .child(el("span").class("tech-name").text(tech.name.as_str()))
    });

    el("section")
        .id(Section::Tech.element_id())
        .class("content-section animated-section")
        .attr("aria-label", "Technologies I use")
        .bounds(layout.tech)
        .child(
            div()
                .class("tech-showcase-container")
                .child(el("h2").class("section-title").text("My Tech Stack"))
                .child(
                    div()
                        .id("tech-scroller")
                        .class("tech-scroller")
                        .child(div().class("tech-scroller-inner").children(items)),
                ),
        )
}

fn projects(projects: &[ProjectRecord], layout: &PageLayout) -> ElementBuilder {
    let cards = projects.iter().enumerate().map(|(i, project)| {
        let card = el("a")
            .id(project_id(i))
            .attr("href", project.link.as_str())
            .attr("target", "_blank")
            .attr("rel", "noopener noreferrer")
            .class("bento-card")
            .class(project.span.class_name())
            .style("transition-delay", format!("{}ms", i * 100));
        let card = match layout.bento.get(i) {
            Some(bounds) => card.bounds(*bounds),
            None => card,
        };
        card.child(div().class("bento-glow")).child(
            div()
                .class("bento-card-content")
                .child(div().class("project-icon-placeholder").child(Icon::Project.element()))
                .child(
                    div()
                        .class("bento-text-wrapper")
                        .child(el("p").class("bento-card-title").text(project.name.as_str()))
                        .child(
                            el("p")
                                .class("bento-card-description")
                                .text(project.description.as_str()),
                        ),
                )
                .child(div().class("bento-card-arrow").child(Icon::ArrowRight.element())),
        )
    });

    el("section")
        .id(Section::Projects.element_id())
        .class("content-section animated-section")
        .bounds(layout.projects)
        .child(
            div()
                .class("projects-title-wrapper")
                .child(el("h2").class("section-title").text("Things I've Built")),
        )
        .child(div().class("bento-grid").children(cards))
}

fn footer(content: &Content, year: i32, layout: &PageLayout) -> ElementBuilder {
    let tags = &content.profile.built_with;
    let mut built_with = div().class("footer-built-with").text("Built with ");
    for (i, tag) in tags.iter().enumerate() {
        if i > 0 {
            built_with = built_with.text(match (tags.len(), i + 1 == tags.len()) {
                (2, _) => " and ",
                (_, true) => ", and ",
                _ => ", ",
            });
        }
        built_with = built_with.child(el("span").class("tech-tag").text(tag.as_str()));
    }
    let built_with = built_with.text(".");

    el("footer")
        .id("footer")
        .class("app-footer")
        .bounds(layout.footer)
        .child(
            div()
                .class("footer-inner")
                .child(div().class("footer-copyright").text(format!(
                    "\u{a9} {year} {}. All Rights Reserved.",
                    content.profile.owner
                )))
                .child(built_with),
        )
}

/// Current calendar year (UTC)
pub fn current_year() -> i32 {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    year_from_unix_days((secs / 86_400) as i64)
}

/// Civil year of a day count since 1970-01-01 (Hinnant's algorithm)
fn year_from_unix_days(days: i64) -> i32 {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    (yoe + era * 400 + i64::from(month <= 2)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn portfolio_page(width: f32) -> Page {
        let content = Content::portfolio();
        let spans: Vec<LayoutSpan> = content.projects.iter().map(|p| p.span).collect();
        Page::build(
            &content,
            &SiteConfig::default(),
            PageLayout::compute(width, &spans),
            ColorScheme::Dark,
            2025,
        )
    }

    #[test]
    fn test_sections_stack_below_header() {
        let layout = PageLayout::compute(1280.0, &[LayoutSpan::Double, LayoutSpan::Single]);
        assert_eq!(layout.hero, Rect::new(90.0, 80.0, 1100.0, 640.0));
        assert_eq!(layout.work.y(), 720.0);
        assert_eq!(layout.deck.y(), 840.0);
        assert_eq!(layout.card, Rect::new(490.0, 920.0, 300.0, 400.0));
        assert_eq!(layout.projects.y(), 1720.0);
        assert_eq!(layout.document_height, layout.footer.bottom());
    }

    #[test]
    fn test_bento_spans_wrap() {
        let spans = [
            LayoutSpan::Double,
            LayoutSpan::Single,
            LayoutSpan::Single,
            LayoutSpan::Double,
        ];
        let layout = PageLayout::compute(1280.0, &spans);
        let rows: Vec<f32> = layout.bento.iter().map(|r| r.y()).collect();
        assert_eq!(rows[0], rows[1]);
        assert_eq!(rows[2], rows[3]);
        assert!(rows[2] > rows[0]);
        assert!(layout.bento[3].width() > layout.bento[2].width());

        let narrow = PageLayout::compute(390.0, &spans);
        assert!(narrow.bento.windows(2).all(|w| w[1].y() > w[0].y()));
        assert!(narrow.bento.iter().all(|r| r.width() == narrow.bento[0].width()));
    }

    #[test]
    fn test_anchors_resolve() {
        let page = portfolio_page(1280.0);
        let anchors = &page.anchors;
        assert!(anchors.header.is_some());
        assert!(anchors.theme_toggle.is_some());
        assert_eq!(anchors.sections.len(), 4);
        assert_eq!(anchors.deck_cards.len(), 4);
        assert_eq!(anchors.projects.len(), 4);
        assert!(anchors.scroller_row.is_some());
        let top = anchors.deck_cards[3];
        assert!(page.tree.has_class(top.wrapper, "deck"));
        assert_eq!(page.tree.attribute(top.wrapper, "data-index"), Some("3"));
        assert_eq!(
            page.tree.bounds(anchors.project(0).unwrap()),
            page.layout.bento.first().copied()
        );
    }

    #[test]
    fn test_relayout_moves_bounds() {
        let mut page = portfolio_page(1280.0);
        let spans = [LayoutSpan::Double, LayoutSpan::Single, LayoutSpan::Single, LayoutSpan::Double];
        page.relayout(390.0, &spans);
        let projects = page.anchors.section(Section::Projects).unwrap();
        assert_eq!(page.tree.bounds(projects), Some(page.layout.projects));
        let first = page.tree.bounds(page.anchors.project(0).unwrap()).unwrap();
        let second = page.tree.bounds(page.anchors.project(1).unwrap()).unwrap();
        assert!(second.y() > first.y());
    }

    #[test]
    fn test_markup_details() {
        let page = portfolio_page(1280.0);
        let html = page.render_body();
        assert!(html.starts_with("<body class=\"theme-dark\">"));
        assert!(html.contains("aria-label=\"Switch to light mode\""));
        assert!(html.contains("data-theme=\"dark\""));
        assert!(html.contains("class=\"bento-card col-span-2\" style=\"transition-delay: 0ms;\""));
        assert!(html.contains("transition-delay: 300ms;"));
        assert!(html.contains("\u{a9} 2025 Gia Huy Phan. All Rights Reserved."));
        assert!(html.contains(
            "Built with <span class=\"tech-tag\">React</span>, <span class=\"tech-tag\">TypeScript</span>, and <span class=\"tech-tag\">React Spring</span>."
        ));
        assert!(html.contains("I build for web &amp; mobile."));
    }

    #[test]
    fn test_document_wraps_body() {
        let page = portfolio_page(1280.0);
        let doc = page.render_document("Folio & Co");
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<title>Folio &amp; Co</title>"));
        assert!(doc.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_year_from_days() {
        assert_eq!(year_from_unix_days(0), 1970);
        assert_eq!(year_from_unix_days(19_722), 2023);
        assert_eq!(year_from_unix_days(19_723), 2024);
        assert_eq!(year_from_unix_days(11_016), 2000);
        assert!(current_year() >= 2024);
    }

    #[test]
    fn test_section_ids() {
        assert_eq!(Section::from_element_id("work"), Some(Section::Work));
        assert_eq!(Section::from_element_id("contact"), None);
        assert_eq!(Section::Work.threshold(), 0.2);
    }
}
