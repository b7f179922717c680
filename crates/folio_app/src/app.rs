//! The portfolio application context
//!
//! [`PortfolioApp`] owns the composed page plus every interaction widget and
//! routes inbound events to them:
//!
//! ```text
//! new() ─► mount(viewport) ─► handle(event) / tick(dt_ms) ─► unmount()
//! ```
//!
//! After any change the affected element attributes, classes and styles
//! are written back into the page tree, so [`PortfolioApp::render_html`]
//! always reflects the current frame.

use crate::config::FolioConfig;
use crate::content::{Content, LayoutSpan};
use crate::error::Result;
use crate::headless_assert::{DiagnosticsElement, DiagnosticsSnapshot};
use crate::headless_runner::HeadlessApp;
use crate::page::{
    current_year, toggle_label, Page, PageLayout, Section, HEADER_SCROLL_THRESHOLD,
    TECH_ITEM_GAP, TECH_ITEM_WIDTH,
};
use crate::targets;
use folio_core::events::event_types;
use folio_core::{Event, EventData, ListenerRegistry, Point, Rect, Viewport};
use folio_layout::widgets::scroller::MARQUEE_PERIOD_MS;
use folio_layout::{
    DeckEngine, ElementTree, GestureOutcome, InfiniteScroller, MarqueeLoop, NodeKind,
    PointerGlow, RevealId, RevealObserver, RotationSource,
};
use folio_theme::{
    ColorScheme, PreferenceStore, SystemSchemeSource, ThemePreference, ThemeState,
};

/// Explicit lifecycle context for the portfolio page
pub struct PortfolioApp<S: PreferenceStore> {
    config: FolioConfig,
    content: Content,
    page: Page,
    theme: ThemeState<S>,
    viewport: Viewport,
    deck: Option<DeckEngine>,
    rotations: Option<Box<dyn RotationSource>>,
    reveals: RevealObserver,
    sections: Vec<(Section, RevealId)>,
    listeners: ListenerRegistry,
    scroller: InfiniteScroller,
    marquee: MarqueeLoop,
    mounted: bool,
    clock_ms: u64,
}

impl<S: PreferenceStore> PortfolioApp<S> {
    /// Compose the page and resolve the initial theme. Nothing animates
    /// until [`mount`](Self::mount).
    pub fn new(
        config: FolioConfig,
        content: Content,
        preference: ThemePreference<S>,
        system: &dyn SystemSchemeSource,
    ) -> Result<Self> {
        let viewport = config.viewport()?;
        let theme = ThemeState::init(preference, system);
        let year = config.site.year.unwrap_or_else(current_year);
        let layout = PageLayout::compute(viewport.width, &spans(&content));
        let page = Page::build(&content, &config.site, layout, theme.scheme(), year);

        let items = content.technologies.len() as f32;
        let row_width = (items * (TECH_ITEM_WIDTH + TECH_ITEM_GAP) - TECH_ITEM_GAP).max(0.0);
        let marquee = MarqueeLoop::new(MARQUEE_PERIOD_MS, row_width, TECH_ITEM_GAP);

        Ok(Self {
            config,
            content,
            page,
            theme,
            viewport,
            deck: None,
            rotations: None,
            reveals: RevealObserver::new(),
            sections: Vec::new(),
            listeners: ListenerRegistry::new(),
            scroller: InfiniteScroller::default(),
            marquee,
            mounted: false,
            clock_ms: 0,
        })
    }

    /// Resting rotations for the deck created at mount
    pub fn with_rotation_source(mut self, rotations: Box<dyn RotationSource>) -> Self {
        self.rotations = Some(rotations);
        self
    }

    /// Enable or disable the animated palette transition
    pub fn with_theme_transitions(mut self, enabled: bool) -> Self {
        self.theme = self.theme.with_transitions(enabled);
        self
    }

    pub fn config(&self) -> &FolioConfig {
        &self.config
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn tree(&self) -> &ElementTree {
        &self.page.tree
    }

    pub fn theme(&self) -> &ThemeState<S> {
        &self.theme
    }

    pub fn scheme(&self) -> ColorScheme {
        self.theme.scheme()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The deck, once mounted
    pub fn deck(&self) -> Option<&DeckEngine> {
        self.deck.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Logical milliseconds ticked since mount
    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn is_revealed(&self, section: Section) -> bool {
        self.sections
            .iter()
            .any(|(s, id)| *s == section && self.reveals.is_revealed(*id))
    }

    /// Springs, timers or the palette still moving. The marquee loops
    /// forever and is not counted.
    pub fn is_animating(&self) -> bool {
        self.theme.is_animating() || self.deck.as_ref().is_some_and(DeckEngine::is_animating)
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Attach observers and listeners, activate the marquee and start the deck
    pub fn mount(&mut self, viewport: Viewport) {
        if self.mounted {
            return;
        }
        if viewport.is_empty() {
            tracing::warn!(?viewport, "mounting with an empty viewport");
        }
        if viewport.width != self.viewport.width {
            self.page.relayout(viewport.width, &spans(&self.content));
        }
        self.viewport = viewport;

        let count = self.content.cards.len();
        let deck_config = self.config.deck.clone();
        self.deck = Some(match self.rotations.take() {
            Some(rotations) => {
                DeckEngine::with_rotation_source(count, deck_config, viewport, rotations)
            }
            None => DeckEngine::new(count, deck_config, viewport),
        });

        if let Some(scroller) = self.page.anchors.scroller {
            self.scroller.activate(&mut self.page.tree, scroller);
        }

        self.sections = self
            .page
            .anchors
            .sections
            .iter()
            .map(|(section, node)| (*section, self.reveals.observe(*node, section.threshold())))
            .collect();

        self.listen();
        self.mounted = true;
        self.update_reveals();
        self.link_scroll();
        self.sync();
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            listeners = self.listeners.len(),
            "portfolio mounted"
        );
    }

    fn listen(&mut self) {
        let listeners = &mut self.listeners;
        for event_type in [
            event_types::SCROLL,
            event_types::RESIZE,
            event_types::COLOR_SCHEME_CHANGE,
            // Released or moved outside the card mid-drag
            event_types::POINTER_MOVE,
            event_types::POINTER_UP,
        ] {
            listeners.listen(targets::WINDOW, event_type);
        }
        listeners.listen(targets::THEME_TOGGLE, event_types::CLICK);
        for anchor in &self.page.anchors.deck_cards {
            let target = targets::deck_card(anchor.index);
            for event_type in [
                event_types::POINTER_DOWN,
                event_types::POINTER_MOVE,
                event_types::POINTER_UP,
            ] {
                listeners.listen(target, event_type);
            }
        }
        for (index, _) in &self.page.anchors.projects {
            listeners.listen(targets::project(*index), event_types::POINTER_MOVE);
        }
    }

    /// Detach every observer, listener and subscription. Later events are
    /// ignored; the tree keeps its last state.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        if let Some(deck) = self.deck.as_mut() {
            deck.pointer_cancel();
        }
        self.reveals.disconnect();
        self.sections.clear();
        self.listeners.clear();
        self.theme.clear_subscriptions();
        self.mounted = false;
        tracing::debug!("portfolio unmounted");
    }

    // ------------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------------

    /// Route one event. Returns false when nothing listens for it.
    pub fn handle(&mut self, event: &Event) -> bool {
        if !self.mounted || !self.listeners.accepts(event) {
            return false;
        }

        let handled = match (event.event_type, &event.data) {
            (event_types::SCROLL, EventData::Scroll { scroll_y, .. }) => {
                self.on_scroll(*scroll_y);
                true
            }
            (event_types::RESIZE, EventData::Resize { width, height }) => {
                self.on_resize(*width, *height)
            }
            (event_types::COLOR_SCHEME_CHANGE, EventData::ColorScheme { dark }) => {
                self.theme.on_system_change(ColorScheme::from_dark(*dark));
                true
            }
            (event_types::CLICK, _) if event.target == targets::THEME_TOGGLE => {
                let scheme = self.theme.toggle();
                tracing::debug!(%scheme, "theme toggled");
                true
            }
            (
                event_types::POINTER_DOWN | event_types::POINTER_MOVE | event_types::POINTER_UP,
                EventData::Pointer { x, y },
            ) => self.on_pointer(event, Point::new(*x, *y)),
            _ => false,
        };

        if handled {
            self.sync();
        }
        handled
    }

    fn on_pointer(&mut self, event: &Event, pos: Point) -> bool {
        let glowed = targets::project_index(event.target)
            .and_then(|index| self.page.anchors.project(index))
            .is_some_and(|card| PointerGlow::apply(&mut self.page.tree, card, pos));

        // A held card keeps following the pointer whatever it is over
        let Some(deck) = self.deck.as_mut() else {
            return glowed;
        };
        let outcome = match event.event_type {
            event_types::POINTER_DOWN => match targets::deck_card_index(event.target) {
                Some(index) => deck.pointer_down(index, pos, event.timestamp),
                None => GestureOutcome::Ignored,
            },
            event_types::POINTER_MOVE => deck.pointer_move(pos, event.timestamp),
            _ => deck.pointer_up(pos, event.timestamp),
        };
        if let GestureOutcome::Dismissed { remaining } = outcome {
            tracing::debug!(remaining, "card dismissed");
        }
        glowed || outcome != GestureOutcome::Ignored
    }

    fn on_scroll(&mut self, scroll_y: f32) {
        self.viewport.scroll_y = scroll_y.max(0.0);
        self.update_reveals();
        self.link_scroll();
    }

    fn on_resize(&mut self, width: f32, height: f32) -> bool {
        if !(width > 0.0 && height > 0.0) {
            tracing::warn!(width, height, "ignoring resize to an empty viewport");
            return false;
        }
        if width != self.viewport.width {
            self.page.relayout(width, &spans(&self.content));
        }
        self.viewport.width = width;
        self.viewport.height = height;
        if let Some(deck) = self.deck.as_mut() {
            deck.resize(self.viewport);
        }
        self.update_reveals();
        self.link_scroll();
        true
    }

    fn update_reveals(&mut self) {
        let tree = &self.page.tree;
        let flipped = self.reveals.update(&self.viewport, |node| tree.bounds(node));
        for id in flipped {
            if let Some((section, _)) = self.sections.iter().find(|(_, s)| *s == id) {
                tracing::debug!(section = section.element_id(), "section revealed");
            }
        }
    }

    fn link_scroll(&mut self) {
        let container = self.page.layout.deck;
        if let Some(deck) = self.deck.as_mut() {
            deck.scroll_link(&self.viewport, container);
        }
    }

    // ------------------------------------------------------------------------
    // Frames
    // ------------------------------------------------------------------------

    /// Advance timers, springs, the marquee and the palette by `dt_ms`
    pub fn tick(&mut self, dt_ms: u64) {
        if !self.mounted {
            return;
        }
        self.clock_ms = self.clock_ms.saturating_add(dt_ms);
        if let Some(deck) = self.deck.as_mut() {
            deck.tick(dt_ms);
        }
        self.marquee.tick(dt_ms as f32);
        self.theme.tick(dt_ms as f32 / 1000.0);
        self.sync();
        tracing::trace!(clock_ms = self.clock_ms, "frame");
    }

    /// Tick in `step_ms` frames until nothing but the marquee is moving,
    /// at most `limit_ms`. Returns the time spent.
    pub fn settle(&mut self, step_ms: u64, limit_ms: u64) -> u64 {
        let step_ms = step_ms.max(1);
        let mut spent = 0;
        while spent < limit_ms && self.is_animating() {
            self.tick(step_ms);
            spent += step_ms;
        }
        spent
    }

    /// Write the current state back into the tree
    fn sync(&mut self) {
        let tree = &mut self.page.tree;
        let anchors = &self.page.anchors;
        let scheme = self.theme.scheme();

        if let Some(body) = anchors.body {
            tree.set_class_name(body, self.theme.root_class());
            for (name, value) in self.theme.css_variables() {
                tree.set_style(body, &name, value);
            }
            if let Some(transition) = self.theme.transition_css() {
                tree.set_style(body, "transition", transition);
            }
        }
        if let Some(header) = anchors.header {
            tree.set_class(
                header,
                "scrolled",
                self.viewport.scroll_y > HEADER_SCROLL_THRESHOLD,
            );
        }
        if let Some(toggle) = anchors.theme_toggle {
            tree.set_attribute(toggle, "data-theme", scheme.as_str());
            tree.set_attribute(toggle, "aria-label", toggle_label(scheme));
        }
        for (section, id) in &self.sections {
            if self.reveals.is_revealed(*id) {
                if let Some(node) = anchors.section(*section) {
                    tree.add_class(node, "is-visible");
                }
            }
        }
        if let Some(deck) = &self.deck {
            for anchor in &anchors.deck_cards {
                if let Some(pose) = deck.pose(anchor.index) {
                    tree.set_style(anchor.wrapper, "transform", pose.translate_css());
                    tree.set_style(anchor.wrapper, "opacity", opacity_css(pose.opacity));
                    tree.set_style(anchor.card, "transform", pose.transform_css());
                }
            }
        }
        if let (Some(scroller), Some(row)) = (anchors.scroller, anchors.scroller_row) {
            if InfiniteScroller::is_activated(tree, scroller) {
                tree.set_style(row, "transform", self.marquee.transform_css());
            }
        }
    }

    // ------------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------------

    /// The full HTML document for the current frame
    pub fn render_html(&self) -> String {
        self.page.render_document(&self.config.site.title)
    }

    /// Current state as seen by headless assertions
    pub fn diagnostics(&self) -> DiagnosticsSnapshot {
        let tree = &self.page.tree;
        let elements = tree
            .root()
            .map(|root| tree.descendants(root))
            .unwrap_or_default()
            .into_iter()
            .filter_map(|id| {
                let node = tree.get(id)?;
                if !matches!(node.kind, NodeKind::Element { .. }) {
                    return None;
                }
                let element_id = node.attributes.get("id")?.clone();
                let text = tree.text_content(id);
                Some((
                    element_id,
                    DiagnosticsElement {
                        text: (!text.is_empty()).then_some(text),
                        classes: node.classes.to_vec(),
                    },
                ))
            })
            .collect();

        let deck = self.deck.as_ref();
        DiagnosticsSnapshot {
            elements,
            theme: Some(self.theme.scheme()),
            dismissed: deck.map(DeckEngine::dismissed).unwrap_or_default(),
            revealed: Section::ALL
                .into_iter()
                .filter(|s| self.is_revealed(*s))
                .map(|s| s.element_id().to_string())
                .collect(),
            cards: deck
                .map(|d| (0..d.len()).filter_map(|i| d.pose(i)).collect())
                .unwrap_or_default(),
        }
    }

    /// Center of card `index` as currently drawn
    pub fn card_center(&self, index: usize) -> Option<Point> {
        let pose = self.deck.as_ref()?.pose(index)?;
        let card = self.page.layout.card;
        Some(Point::new(
            card.x() + card.width() / 2.0 + pose.x,
            card.y() + card.height() / 2.0 + pose.y,
        ))
    }

    pub fn project_bounds(&self, index: usize) -> Option<Rect> {
        self.page.tree.bounds(self.page.anchors.project(index)?)
    }

    /// Tear down and hand back the preference store
    pub fn into_preference(mut self) -> ThemePreference<S> {
        self.unmount();
        self.theme.into_preference()
    }
}

impl<S: PreferenceStore> HeadlessApp for PortfolioApp<S> {
    fn mount(&mut self, viewport: Viewport) {
        PortfolioApp::mount(self, viewport);
    }

    fn dispatch(&mut self, event: &Event) -> bool {
        self.handle(event)
    }

    fn advance(&mut self, dt_ms: u64) {
        self.tick(dt_ms);
    }

    fn snapshot(&self) -> DiagnosticsSnapshot {
        self.diagnostics()
    }

    fn card_center(&self, index: usize) -> Option<Point> {
        PortfolioApp::card_center(self, index)
    }

    fn project_bounds(&self, index: usize) -> Option<Rect> {
        PortfolioApp::project_bounds(self, index)
    }
}

fn spans(content: &Content) -> Vec<LayoutSpan> {
    content.projects.iter().map(|p| p.span).collect()
}

fn opacity_css(opacity: f32) -> String {
    let rounded = (opacity.clamp(0.0, 1.0) * 1000.0).round() / 1000.0;
    format!("{rounded}")
}
