//! The marketplace's navigation menu. Static; nothing is fetched.

use serde::Serialize;

/// One entry in the navigation menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub label: &'static str,
    pub path: &'static str,
}

const MENU: &[MenuItem] = &[
    MenuItem {
        label: "Marketplace",
        path: "/",
    },
    MenuItem {
        label: "My NFTs",
        path: "/my-nfts",
    },
    MenuItem {
        label: "Mint",
        path: "/mint",
    },
    MenuItem {
        label: "Payments",
        path: "/payments",
    },
];

/// The navigation menu, in display order.
pub fn navigation_menu() -> &'static [MenuItem] {
    MENU
}
