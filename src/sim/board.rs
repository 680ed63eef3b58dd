//! Board generation
//!
//! Builds a shuffled, paired sequence of card identities for a W×H board.
//! Identity assignment and geometry are independent: the shuffle decides
//! which id sits at each index, the layout decides where each index is drawn.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::card::{Card, CardId};
use crate::consts::{BOARD_EXTENT, CARD_SPACING_RATIO, MAX_BOARD_DIMENSION, MIN_BOARD_DIMENSION};
use crate::error::{Error, Result};

/// Card size and gap, derived from the board dimensions only
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoardLayout {
    /// Edge length of one (square) card
    pub card_size: f32,
    /// Gap between neighbouring cards
    pub spacing: f32,
}

impl BoardLayout {
    /// Largest card size for which a `width × height` grid fits in `extent`
    pub fn fit(width: u32, height: u32, extent: Vec2, spacing_ratio: f32) -> Self {
        let w = width.max(1) as f32;
        let h = height.max(1) as f32;
        let across = w + (w - 1.0) * spacing_ratio;
        let down = h + (h - 1.0) * spacing_ratio;
        let card_size = (extent.x / across).min(extent.y / down);
        Self {
            card_size,
            spacing: card_size * spacing_ratio,
        }
    }

    /// Center of the card at `index`, row-major, board centered on the origin
    pub fn position(&self, index: usize, width: u32, height: u32) -> Vec2 {
        let pitch = self.card_size + self.spacing;
        let col = (index % width as usize) as f32;
        let row = (index / width as usize) as f32;
        let half_w = (width as f32 - 1.0) / 2.0;
        let half_h = (height as f32 - 1.0) / 2.0;
        // Row 0 is the top row
        Vec2::new((col - half_w) * pitch, (half_h - row) * pitch)
    }
}

/// A generated board
#[derive(Debug, Clone)]
pub struct Board {
    /// Columns (after even-count adjustment)
    pub width: u32,
    /// Rows (after even-count adjustment)
    pub height: u32,
    /// Seed the identities were shuffled with
    pub seed: u64,
    pub layout: BoardLayout,
    pub cards: Vec<Card>,
}

impl Board {
    pub fn cell_count(&self) -> usize {
        self.cards.len()
    }

    /// Card identities in board order
    pub fn ids(&self) -> Vec<CardId> {
        self.cards.iter().map(|c| c.card_id).collect()
    }
}

/// Force an even cell count by shrinking the larger dimension (width on a tie)
pub fn even_dimensions(width: u32, height: u32) -> (u32, u32) {
    if (u64::from(width) * u64::from(height)) % 2 == 0 {
        return (width, height);
    }
    if height > width {
        (width, height - 1)
    } else {
        (width - 1, height)
    }
}

/// `cells / 2` ids cycling through the image range, each duplicated once
pub fn pair_ids(cells: usize, image_count: u32) -> Vec<CardId> {
    let mut ids = Vec::with_capacity(cells);
    for pair in 0..cells / 2 {
        let id = pair as CardId % image_count;
        ids.push(id);
        ids.push(id);
    }
    ids
}

/// Uniform Fisher-Yates: position `i` swaps with a random index in `[i, n)`
pub fn shuffle<T, R: Rng>(items: &mut [T], rng: &mut R) {
    let n = items.len();
    for i in 0..n {
        let j = rng.random_range(i..n);
        items.swap(i, j);
    }
}

/// Generate a shuffled, paired board
///
/// # Errors
///
/// Returns `InvalidConfiguration` if `image_count` is zero or either
/// dimension is outside `MIN_BOARD_DIMENSION..=MAX_BOARD_DIMENSION`.
pub fn generate(width: u32, height: u32, image_count: u32, seed: u64) -> Result<Board> {
    if image_count == 0 {
        return Err(Error::invalid_config("at least one card image is required"));
    }
    if width < MIN_BOARD_DIMENSION || height < MIN_BOARD_DIMENSION {
        return Err(Error::invalid_config(format!(
            "board must be at least {}x{}, got {}x{}",
            MIN_BOARD_DIMENSION, MIN_BOARD_DIMENSION, width, height
        )));
    }
    if width > MAX_BOARD_DIMENSION || height > MAX_BOARD_DIMENSION {
        return Err(Error::invalid_config(format!(
            "board must be at most {}x{}, got {}x{}",
            MAX_BOARD_DIMENSION, MAX_BOARD_DIMENSION, width, height
        )));
    }

    let (width, height) = even_dimensions(width, height);
    let cells = width
        .checked_mul(height)
        .ok_or_else(|| Error::invalid_config("board cell count overflows"))?
        as usize;

    let mut ids = pair_ids(cells, image_count);
    let mut rng = Pcg32::seed_from_u64(seed);
    shuffle(&mut ids, &mut rng);

    let layout = BoardLayout::fit(width, height, BOARD_EXTENT, CARD_SPACING_RATIO);
    let cards = ids
        .into_iter()
        .enumerate()
        .map(|(index, id)| Card::new(index, id, layout.position(index, width, height)))
        .collect();

    log::debug!(
        "Generated {}x{} board ({} cards, {} images, seed {})",
        width,
        height,
        cells,
        image_count,
        seed
    );

    Ok(Board {
        width,
        height,
        seed,
        layout,
        cards,
    })
}
