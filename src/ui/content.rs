//! Static page content, kept apart from the templates that render it

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct FeaturedApp {
    pub icon: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub url: &'static str,
}

pub const FEATURED_APPS: &[FeaturedApp] = &[
    FeaturedApp {
        icon: "🎮",
        name: "Cool Math Games",
        description: "Educational games and puzzles",
        url: "https://coolmathgames.com",
    },
    FeaturedApp {
        icon: "🎯",
        name: "Slope",
        description: "Endless runner game",
        url: "https://slope-game.com",
    },
    FeaturedApp {
        icon: "🧩",
        name: "2048",
        description: "Number puzzle game",
        url: "https://2048game.com",
    },
    FeaturedApp {
        icon: "🎲",
        name: "Unblocked Games",
        description: "Collection of unblocked games",
        url: "https://unblockedgames.com",
    },
];

#[derive(Debug, Clone, Serialize)]
pub struct ChangeGroup {
    pub heading: &'static str,
    pub items: &'static [&'static str],
}

#[derive(Debug, Clone, Serialize)]
pub struct Release {
    pub version: &'static str,
    pub date: &'static str,
    pub latest: bool,
    pub groups: &'static [ChangeGroup],
}

pub const CHANGELOG: &[Release] = &[
    Release {
        version: "v2.1.0",
        date: "December 2024",
        latest: true,
        groups: &[
            ChangeGroup {
                heading: "✨ New Features",
                items: &[
                    "Added Space-style settings panel",
                    "Implemented Tab Cloaking with multiple options",
                    "Added Panic Key functionality",
                    "New cyberpunk terminal-style search bar",
                ],
            },
            ChangeGroup {
                heading: "🔧 Improvements",
                items: &[
                    "Enhanced proxy engine selection",
                    "Improved mobile responsiveness",
                    "Better error handling and notifications",
                ],
            },
            ChangeGroup {
                heading: "🐛 Bug Fixes",
                items: &[
                    "Fixed proxy URL generation",
                    "Resolved settings panel navigation issues",
                    "Improved dropdown functionality",
                ],
            },
        ],
    },
    Release {
        version: "v2.0.0",
        date: "November 2024",
        latest: false,
        groups: &[ChangeGroup {
            heading: "✨ Major Update",
            items: &[
                "Complete UI redesign with cyberpunk theme",
                "Added multiple proxy engines (Rammerhead, Scramjet, Wisp)",
                "Implemented PWA functionality",
                "Added quick links and featured games section",
            ],
        }],
    },
];

#[derive(Debug, Clone, Serialize)]
pub struct PatchNote {
    pub title: &'static str,
    pub body: &'static str,
}

pub const PATCH_NOTES: &[PatchNote] = &[
    PatchNote {
        title: "Patch 2.1.1 - December 15, 2024",
        body: "Fixed Rammerhead proxy URL configuration and improved connection stability.",
    },
    PatchNote {
        title: "Patch 2.1.0 - December 10, 2024",
        body: "Initial release of Space-style settings panel with enhanced navigation.",
    },
];

#[derive(Debug, Clone, Serialize)]
pub struct FaqEntry {
    pub question: &'static str,
    pub answer: &'static str,
}

pub const FAQ: &[FaqEntry] = &[
    FaqEntry {
        question: "Why is a site blocked?",
        answer: "Sites may be blocked due to network restrictions, content filters, or geographic limitations. Our proxy servers help bypass these restrictions by routing your traffic through different servers.",
    },
    FaqEntry {
        question: "How to add links?",
        answer: "Quick links are read from the ui.quick_links list in settings.yml. Add an entry with a name, icon and URL and restart the server.",
    },
    FaqEntry {
        question: "How do proxies work?",
        answer: "Proxies act as intermediaries between your device and the internet. They receive your requests, forward them to the target website, and return the response, effectively hiding your real location and IP address.",
    },
    FaqEntry {
        question: "Is using a proxy legal?",
        answer: "Using proxies is generally legal for legitimate purposes like privacy protection and accessing geo-restricted content. However, always comply with local laws and website terms of service.",
    },
];

#[derive(Debug, Clone, Serialize)]
pub struct TeamCredit {
    pub avatar: &'static str,
    pub name: &'static str,
    pub role: &'static str,
}

pub const TEAM: &[TeamCredit] = &[
    TeamCredit {
        avatar: "👨‍💻",
        name: "Development Team",
        role: "Core developers and engineers",
    },
    TeamCredit {
        avatar: "🎨",
        name: "Design Team",
        role: "UI/UX designers and artists",
    },
    TeamCredit {
        avatar: "🔒",
        name: "Security Team",
        role: "Security researchers and analysts",
    },
];

/// Tab titles offered by the cloaking section
pub const CLOAK_PRESETS: &[&str] = &[
    "None (Default)",
    "Desmos",
    "Google Classroom",
    "Google Docs",
    "Google Drive",
    "Google Meet",
    "Google Sheets",
    "Google Slides",
    "Google Translate",
    "Khan Academy",
    "Nearpod",
    "Pear Deck",
    "PowerSchool",
    "Quizlet",
    "Scholastic",
    "Seesaw",
    "Zoom",
];

/// Build identifier shown on the about view
pub const BUILD: &str = "#2024.12.15";
pub const LAST_UPDATED: &str = "December 2024";
