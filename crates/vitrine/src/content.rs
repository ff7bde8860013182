#![forbid(unsafe_code)]

//! Static site content.
//!
//! Everything the page shows lives here as `'static` tables; the builder
//! functions turn the tables into widget inputs.

use vitrine_core::geometry::Point;
use vitrine_widgets::carousel::Card;
use vitrine_widgets::marquee::MarqueeItem;
use vitrine_widgets::orbital::{NodeStatus, TimelineItem};
use vitrine_widgets::scroll_gradient::Orb;
use vitrine_widgets::StyleToken;

use crate::page::Section;

/// One tech-stack node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tech {
    pub id: u32,
    pub title: &'static str,
    pub summary: &'static str,
    pub category: &'static str,
    pub logo: &'static str,
    pub related: &'static [u32],
    pub energy: u8,
}

pub const TECH_STACK: [Tech; 14] = [
    Tech {
        id: 1,
        title: "Java",
        summary: "Object-oriented language for backend and Android.",
        category: "Language",
        logo: "/icons/icons8-java.svg",
        related: &[14],
        energy: 85,
    },
    Tech {
        id: 2,
        title: "Python",
        summary: "Scripting, data science, and automation.",
        category: "Language",
        logo: "/icons/icons8-python.svg",
        related: &[8, 11],
        energy: 90,
    },
    Tech {
        id: 3,
        title: "JavaScript",
        summary: "Frontend and Node.js runtime.",
        category: "Language",
        logo: "/icons/javascript-logo-svgrepo-com.svg",
        related: &[4, 5],
        energy: 88,
    },
    Tech {
        id: 4,
        title: "React.js",
        summary: "UI library for single-page applications.",
        category: "Frontend",
        logo: "/icons/icons8-react-js.svg",
        related: &[3, 5],
        energy: 85,
    },
    Tech {
        id: 5,
        title: "Node.js",
        summary: "JavaScript runtime for server-side apps.",
        category: "Backend",
        logo: "/icons/icons8-nodejs.svg",
        related: &[3, 4],
        energy: 80,
    },
    Tech {
        id: 6,
        title: "C++",
        summary: "Systems and performance-critical code.",
        category: "Language",
        logo: "/icons/icons8-c++.svg",
        related: &[7],
        energy: 70,
    },
    Tech {
        id: 7,
        title: "Dart",
        summary: "Language powering Flutter apps.",
        category: "Language",
        logo: "/icons/icons8-dart.svg",
        related: &[6, 12],
        energy: 75,
    },
    Tech {
        id: 8,
        title: "Pandas",
        summary: "Data analysis and manipulation in Python.",
        category: "Data",
        logo: "/icons/icons8-pandas.svg",
        related: &[2, 11],
        energy: 82,
    },
    Tech {
        id: 9,
        title: "AWS",
        summary: "Cloud infrastructure and services.",
        category: "Cloud",
        logo: "/icons/aws-svgrepo-com.svg",
        related: &[5],
        energy: 72,
    },
    Tech {
        id: 10,
        title: "Postman",
        summary: "API development and testing.",
        category: "Tools",
        logo: "/icons/postman-icon.svg",
        related: &[5, 11],
        energy: 88,
    },
    Tech {
        id: 11,
        title: "Flask",
        summary: "Lightweight Python web framework.",
        category: "Backend",
        logo: "/icons/flask.svg",
        related: &[2, 8],
        energy: 85,
    },
    Tech {
        id: 12,
        title: "Flutter",
        summary: "Cross-platform mobile and desktop UI.",
        category: "Frontend",
        logo: "/icons/flutter.svg",
        related: &[7],
        energy: 78,
    },
    Tech {
        id: 13,
        title: "Ruby",
        summary: "Dynamic language and Rails ecosystem.",
        category: "Language",
        logo: "/icons/ruby.svg",
        related: &[11],
        energy: 65,
    },
    Tech {
        id: 14,
        title: "Spring Boot",
        summary: "Java application framework for production apps.",
        category: "Backend",
        logo: "/icons/spring.svg",
        related: &[1],
        energy: 75,
    },
];

/// A project card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Project {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub description: &'static str,
    pub image: &'static str,
    pub tags: &'static [&'static str],
    pub github: &'static str,
}

pub const PROJECTS: [Project; 3] = [
    Project {
        title: "FinTeach",
        subtitle: "HackUNT Winner",
        description: "An AI-powered budgeting app built using the Plaid API and a supervised \
                      learning model to provide Texas teachers with personalized financial \
                      insights.",
        image: "/images/finteach.png",
        tags: &["React.js", "Flask", "Plaid API", "OpenAI API"],
        github: "https://github.com/RidwanAmin21",
    },
    Project {
        title: "CatchUp",
        subtitle: "ACM Projects Winner",
        description: "A mobile social media app that facilitates unique daily video montages \
                      for enhanced user interaction.",
        image: "https://images.unsplash.com/photo-1611162617474-5b21e879e113?auto=format&fit=crop&w=600&q=80",
        tags: &["Flutter", "Firebase", "FFmpeg API"],
        github: "https://github.com/RidwanAmin21",
    },
    Project {
        title: "Pilot",
        subtitle: "Insurance recommendations platform",
        description: "Gathers small business information, develops a risk score, and provides \
                      personalized insurance recommendations.",
        image: "/images/pilot.png",
        tags: &["React.js", "MongoDB", "Vertex AI"],
        github: "https://github.com/RidwanAmin21",
    },
];

/// A position in the experience slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Experience {
    pub company: &'static str,
    pub role: &'static str,
    pub short_role: &'static str,
    pub team: Option<&'static str>,
    pub location: &'static str,
    pub date: &'static str,
    pub tags: &'static [&'static str],
    pub logo: &'static str,
    /// Shown with the "Incoming" badge.
    pub featured: bool,
}

pub const EXPERIENCE: [Experience; 4] = [
    Experience {
        company: "UTD Networking Lab",
        role: "Undergraduate ML Researcher",
        short_role: "ML Researcher",
        team: None,
        location: "Richardson, TX",
        date: "Aug 2024 – May 2025",
        tags: &["Machine Learning", "Python", "Network Security"],
        logo: "/icons/UT_Dallas_2_Color_Emblem_-_SVG_Brand_Identity_File.svg.png",
        featured: false,
    },
    Experience {
        company: "Fannie Mae",
        role: "Software Engineering Intern",
        short_role: "SWE Intern",
        team: Some("Underwriting Core & Collateral Data Technology"),
        location: "Plano, TX",
        date: "Jun 2024 – Aug 2024",
        tags: &["Spring Boot", "AWS S3", "DynamoDB", "Java", "Terraform"],
        logo: "/icons/FNMA.svg",
        featured: false,
    },
    Experience {
        company: "Amazon Web Services",
        role: "Software Development Engineering Intern",
        short_role: "SDE Intern",
        team: Some("EC2 Elastic Load Balancing - API Orchestration"),
        location: "Seattle, WA",
        date: "May 2025 – Aug 2025",
        tags: &["AWS", "DynamoDB", "MySQL", "Pub/Sub"],
        logo: "/icons/aws-svgrepo-com.svg",
        featured: false,
    },
    Experience {
        company: "Amazon Web Services",
        role: "Software Development Engineer",
        short_role: "SDE, Full-Time",
        team: None,
        location: "Seattle, WA",
        date: "Starting August 2026",
        tags: &["AWS", "Full-Time", "New Grad"],
        logo: "/icons/aws-svgrepo-com.svg",
        featured: true,
    },
];

/// Where a navigation entry leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTarget {
    /// An anchor on the page.
    Section(Section),
    /// A document served next to the page.
    Document(&'static str),
}

impl NavTarget {
    pub const fn href(self) -> &'static str {
        match self {
            Self::Section(section) => section.anchor(),
            Self::Document(path) => path,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavEntry {
    pub title: &'static str,
    pub target: NavTarget,
}

pub const NAVIGATION: [NavEntry; 6] = [
    NavEntry {
        title: "Home",
        target: NavTarget::Section(Section::Home),
    },
    NavEntry {
        title: "About",
        target: NavTarget::Section(Section::About),
    },
    NavEntry {
        title: "Projects",
        target: NavTarget::Section(Section::Projects),
    },
    NavEntry {
        title: "Experience",
        target: NavTarget::Section(Section::Experience),
    },
    NavEntry {
        title: "Contact",
        target: NavTarget::Section(Section::Contact),
    },
    NavEntry {
        title: "Resume",
        target: NavTarget::Document("/Ridwan_Amin_Resume_2025__Copy_%20(1).pdf"),
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactLink {
    pub name: &'static str,
    pub href: &'static str,
    pub description: &'static str,
}

pub const CONTACT: [ContactLink; 3] = [
    ContactLink {
        name: "LinkedIn",
        href: "https://www.linkedin.com/in/ridwan-amin-345621248/",
        description: "Professional Network",
    },
    ContactLink {
        name: "GitHub",
        href: "https://github.com/RidwanAmin21",
        description: "Code & Projects",
    },
    ContactLink {
        name: "Email",
        href: "mailto:ridwan.amin41@gmail.com",
        description: "ridwan.amin41@gmail.com",
    },
];

/// Hero tagline, typed once.
pub const TAGLINE: &str = "I build digital experiences people remember.";

/// Tail of the tagline drawn in the muted style.
pub const TAGLINE_MUTED: &str = "people remember.";

/// Ring nodes for the tech-stack timeline.
pub fn tech_timeline() -> Vec<TimelineItem> {
    TECH_STACK
        .iter()
        .map(|tech| {
            TimelineItem::new(tech.id, tech.title)
                .date("Tech")
                .content(tech.summary)
                .category(tech.category)
                .icon(tech.logo)
                .related(tech.related.iter().copied())
                .status(NodeStatus::Completed)
                .energy(tech.energy)
        })
        .collect()
}

/// Marquee tiles: the tech logos with their names.
pub fn tech_logos() -> Vec<MarqueeItem> {
    TECH_STACK
        .iter()
        .map(|tech| MarqueeItem::new(tech.logo).label(tech.title))
        .collect()
}

pub fn project_cards() -> Vec<Card> {
    PROJECTS
        .iter()
        .map(|p| Card::new(p.title, p.subtitle).image(p.image))
        .collect()
}

pub fn experience_cards() -> Vec<Card> {
    EXPERIENCE
        .iter()
        .map(|e| Card::new(e.company, e.short_role).image(e.logo))
        .collect()
}

/// The four background orbs.
pub fn gradient_orbs() -> Vec<Orb> {
    vec![
        Orb {
            style: StyleToken::Accent,
            start: Point::new(10.0, -10.0),
            end: Point::new(5.0, 70.0),
            size: 600.0,
            blur: 140.0,
            opacity: (0.13, 0.07),
        },
        Orb {
            style: StyleToken::AccentWarm,
            start: Point::new(75.0, 60.0),
            end: Point::new(80.0, 20.0),
            size: 500.0,
            blur: 140.0,
            opacity: (0.10, 0.12),
        },
        Orb {
            style: StyleToken::AccentGlow,
            start: Point::new(85.0, 20.0),
            end: Point::new(60.0, 85.0),
            size: 450.0,
            blur: 130.0,
            opacity: (0.12, 0.09),
        },
        Orb {
            style: StyleToken::Accent,
            start: Point::new(40.0, 80.0),
            end: Point::new(30.0, 30.0),
            size: 400.0,
            blur: 150.0,
            opacity: (0.04, 0.10),
        },
    ]
}
