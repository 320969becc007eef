use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::chain::Address;

/// Read-only mirror of one post held by the contract. Never persisted
/// locally; every render cycle re-fetches the full set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Tweet {
    pub id: u64,
    pub author: Address,
    pub content: String,
    pub likes: u64,
    pub timestamp: u64,
}

/// Stable total order for the feed: newest first, ties broken by id
/// ascending. The tie-break is explicit so equal timestamps render the
/// same way on every fetch.
pub fn sort_posts(posts: &mut [Tweet]) {
    posts.sort_by(|a, b| {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Strip bytes that could reprogram the terminal before content reaches
/// the frame. Newlines and tabs become spaces, all other control chars
/// (including ESC, so no ANSI sequences survive) are dropped.
pub fn sanitize_content(raw: &str) -> String {
    raw.chars()
        .filter_map(|c| match c {
            '\n' | '\r' | '\t' => Some(' '),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}

/// Pure mapping from an address to a remote avatar image URL.
pub fn avatar_url(base: &str, address: &Address) -> String {
    format!(
        "{}?seed={}",
        base.trim_end_matches('/'),
        urlencoding::encode(address.as_str())
    )
}

const IDENTICON_SIZE: usize = 5;

/// Deterministic per-address block-art avatar for the terminal: a 5x5
/// grid mirrored around the vertical axis, colored from the address hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identicon {
    pub rgb: (u8, u8, u8),
    pub grid: [[bool; IDENTICON_SIZE]; IDENTICON_SIZE],
}

pub fn identicon(address: &Address) -> Identicon {
    let digest = Sha256::digest(address.as_str().as_bytes());

    // Keep colors away from the dark end so cells stay visible.
    let rgb = (
        128 | digest[0],
        128 | digest[1],
        128 | digest[2],
    );

    let mut grid = [[false; IDENTICON_SIZE]; IDENTICON_SIZE];
    let mut bit = 0usize;
    for row in 0..IDENTICON_SIZE {
        // Fill the left half plus center, mirror the rest.
        for col in 0..=IDENTICON_SIZE / 2 {
            let byte = digest[3 + bit / 8];
            let on = (byte >> (bit % 8)) & 1 == 1;
            bit += 1;
            grid[row][col] = on;
            grid[row][IDENTICON_SIZE - 1 - col] = on;
        }
    }

    Identicon { rgb, grid }
}
