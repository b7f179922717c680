//! Static portfolio content
//!
//! Read-only data consumed by the page composer. Bio cards are stored in
//! authoring order and reversed once by [`Content::new`], so the first
//! authored card ends up on top of the deck.

use crate::icons::Icon;

/// What a bio card shows above its title
#[derive(Clone, Debug, PartialEq)]
pub enum CardVisual {
    Icon(Icon),
    /// Raster company logo
    Logo { src: String, alt: String },
    /// Text placeholder standing in for a logo
    Wordmark(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct CardRecord {
    pub id: String,
    pub title: String,
    pub text: String,
    pub visual: CardVisual,
}

/// Bento grid column span
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutSpan {
    #[default]
    Single,
    Double,
}

impl LayoutSpan {
    pub fn columns(self) -> usize {
        match self {
            LayoutSpan::Single => 1,
            LayoutSpan::Double => 2,
        }
    }

    pub fn class_name(self) -> &'static str {
        match self {
            LayoutSpan::Single => "col-span-1",
            LayoutSpan::Double => "col-span-2",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProjectRecord {
    pub name: String,
    pub description: String,
    pub link: String,
    pub span: LayoutSpan,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Technology {
    pub name: String,
    pub logo: String,
    /// Extra class for logos that need their own sizing
    pub class: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ContactLink {
    pub label: String,
    pub href: String,
    pub icon: Icon,
    /// Opens in a new tab
    pub external: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Profile {
    pub greeting: String,
    pub name: String,
    pub tagline: String,
    pub description: String,
    /// Copyright holder in the footer
    pub owner: String,
    pub built_with: Vec<String>,
}

/// Everything the page renders
#[derive(Clone, Debug, PartialEq)]
pub struct Content {
    /// Deck order: index 0 is the bottom of the stack
    pub cards: Vec<CardRecord>,
    pub projects: Vec<ProjectRecord>,
    pub technologies: Vec<Technology>,
    pub contacts: Vec<ContactLink>,
    pub profile: Profile,
}

impl Content {
    /// Build content from cards in authoring order
    pub fn new(
        mut cards: Vec<CardRecord>,
        projects: Vec<ProjectRecord>,
        technologies: Vec<Technology>,
        contacts: Vec<ContactLink>,
        profile: Profile,
    ) -> Self {
        cards.reverse();
        Self {
            cards,
            projects,
            technologies,
            contacts,
            profile,
        }
    }

    /// The bundled portfolio
    pub fn portfolio() -> Self {
        Self::new(cards(), projects(), technologies(), contacts(), profile())
    }
}

impl Default for Content {
    fn default() -> Self {
        Self::portfolio()
    }
}

fn card(id: &str, title: &str, text: &str, visual: CardVisual) -> CardRecord {
    CardRecord {
        id: id.to_string(),
        title: title.to_string(),
        text: text.to_string(),
        visual,
    }
}

fn cards() -> Vec<CardRecord> {
    vec![
        card(
            "skills",
            "My Tech Arsenal",
            "From React Native to SAP ABAP, I love exploring different tech stacks. Currently focused on TypeScript and building scalable mobile experiences with Redux.",
            CardVisual::Icon(Icon::Code),
        ),
        card(
            "projects",
            "Personal Projects",
            "I build apps that solve real-world problems. Each project is an opportunity to refine my skills in user experience and product design.",
            CardVisual::Icon(Icon::Rocket),
        ),
        card(
            "hahaho",
            "HAHAHO Digital (2022)",
            "As a Business Analyst, I learned to translate complex business needs into actionable technical specifications, bridging the gap between stakeholders and developers.",
            CardVisual::Wordmark("HAHAHO".to_string()),
        ),
        card(
            "fpt",
            "FPT Software (2022-Present)",
            "Currently developing enterprise-grade solutions, from SAP Fiori apps to Salesforce Lightning Web Components. Focused on creating intuitive and maintainable systems.",
            CardVisual::Logo {
                src: "assets/fpt-logo.png".to_string(),
                alt: "FPT Software Logo".to_string(),
            },
        ),
    ]
}

fn project(name: &str, description: &str, link: &str, span: LayoutSpan) -> ProjectRecord {
    ProjectRecord {
        name: name.to_string(),
        description: description.to_string(),
        link: link.to_string(),
        span,
    }
}

fn projects() -> Vec<ProjectRecord> {
    vec![
        project(
            "Orange Pass",
            "A secure QR code management system for seamless event check-ins.",
            "https://github.com/ghuyphan/Orange-Pass",
            LayoutSpan::Double,
        ),
        project(
            "Orange 2",
            "A personal finance companion with smart categorization and data viz.",
            "https://github.com/ghuyphan/Orange-2",
            LayoutSpan::Single,
        ),
        project(
            "Apollo",
            "A language learning app using bite-sized videos to improve retention.",
            "https://github.com/ghuyphan/Apollo",
            LayoutSpan::Single,
        ),
        project(
            "Petty",
            "Discover and share locations with friends in real-time.",
            "https://github.com/ghuyphan/Petty",
            LayoutSpan::Double,
        ),
    ]
}

fn technologies() -> Vec<Technology> {
    const REACT: &str =
        "https://upload.wikimedia.org/wikipedia/commons/thumb/a/a7/React-icon.svg/1150px-React-icon.svg.png";
    let tech = |name: &str, logo: &str, class: Option<&str>| Technology {
        name: name.to_string(),
        logo: logo.to_string(),
        class: class.map(str::to_string),
    };
    vec![
        tech("HTML5", "https://upload.wikimedia.org/wikipedia/commons/6/61/HTML5_logo_and_wordmark.svg", None),
        tech("CSS3", "https://upload.wikimedia.org/wikipedia/commons/d/d5/CSS3_logo_and_wordmark.svg", None),
        tech("JavaScript", "https://upload.wikimedia.org/wikipedia/commons/6/6a/JavaScript-logo.png", None),
        tech("TypeScript", "https://upload.wikimedia.org/wikipedia/commons/4/4c/Typescript_logo_2020.svg", None),
        tech("React", REACT, None),
        tech("React Native", REACT, None),
        tech("Expo", "assets/expo-logo.svg", Some("expo-logo-img")),
        tech("Redux", "https://raw.githubusercontent.com/reduxjs/redux/master/logo/logo.png", None),
        tech("Node.js", "https://cdn.iconscout.com/icon/free/png-256/free-node-js-1174925.png", None),
        tech("Git", "https://git-scm.com/images/logos/downloads/Git-Icon-1788C.png", None),
        tech("SQLite", "https://images.icon-icons.com/2699/PNG/512/sqlite_logo_icon_169724.png", None),
        tech("SAPUI5", "assets/sapUi5-logo.svg", Some("sapui5-logo-img")),
        tech("SAP ABAP", "https://upload.wikimedia.org/wikipedia/commons/5/59/SAP_2011_logo.svg", None),
    ]
}

fn contacts() -> Vec<ContactLink> {
    let link = |label: &str, href: &str, icon: Icon| ContactLink {
        label: label.to_string(),
        href: href.to_string(),
        icon,
        external: !href.starts_with("mailto:"),
    };
    vec![
        link("Github", "https://github.com/ghuyphan", Icon::Github),
        link("LinkedIn", "https://linkedin.com/in/giahuyphan", Icon::LinkedIn),
        link("Twitter", "https://x.com/your_handle", Icon::Twitter),
        link("Email", "mailto:giahuyphan0110@gmail.com", Icon::Mail),
    ]
}

fn profile() -> Profile {
    Profile {
        greeting: "Hello, world! I'm".to_string(),
        name: "Gia Huy.".to_string(),
        tagline: "I build for web & mobile.".to_string(),
        description: "I'm a software developer focused on building robust, scalable applications and turning complex business problems into elegant, user-friendly solutions.".to_string(),
        owner: "Gia Huy Phan".to_string(),
        built_with: vec![
            "React".to_string(),
            "TypeScript".to_string(),
            "React Spring".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cards_reversed_from_authoring_order() {
        let content = Content::portfolio();
        let ids: Vec<&str> = content.cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["fpt", "hahaho", "projects", "skills"]);
    }

    #[test]
    fn test_bundled_collections() {
        let content = Content::portfolio();
        assert_eq!(content.technologies.len(), 13);
        let spans: Vec<usize> = content.projects.iter().map(|p| p.span.columns()).collect();
        assert_eq!(spans, [2, 1, 1, 2]);
        assert!(content.contacts.iter().filter(|c| c.external).count() == 3);
    }
}
