//! Scrolling road and roadside scenery
//!
//! Each strip is a column of equally tall tiles that scrolls down with the
//! player's speed. After every scroll a tile is added above the first one if
//! its top edge has come into view, and the last tile is dropped once it has
//! left the bottom of the viewport.

use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::VecDeque;

use super::kinds::{Footprint, ROAD_FOOTPRINT, SIDEWAY_FOOTPRINT};
use super::types::RoadGeometry;

/// Roadside tile variants and their weights.
/// Water and trees are common; the two field variants are kept rare.
const SIDEWAY_VARIANTS: [(u8, f64); 4] = [(1, 0.45), (2, 0.45), (3, 0.05), (4, 0.05)];

/// Which strip a tile belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripSide {
    Left,
    Road,
    Right,
}

/// One tile of a scrolling strip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollBlock {
    /// Top edge
    pub y: f32,
    /// Sprite variant, starting at 1
    pub variant: u8,
}

/// A vertical strip of tiles
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollingStrip {
    pub side: StripSide,
    /// Left edge of every tile in the strip
    pub x: f32,
    pub tile_height: f32,
    /// Tiles ordered top to bottom
    pub blocks: VecDeque<ScrollBlock>,
}

impl ScrollingStrip {
    fn new<R: Rng + ?Sized>(
        side: StripSide,
        x: f32,
        tile: Footprint,
        geometry: &RoadGeometry,
        rng: &mut R,
    ) -> Self {
        let tile_height = tile.scaled(geometry.scale).height;
        let count = (geometry.viewport_height / tile_height).ceil() as usize;
        let blocks = (0..count)
            .map(|i| ScrollBlock {
                y: tile_height * i as f32,
                variant: pick_variant(side, rng),
            })
            .collect();

        Self {
            side,
            x,
            tile_height,
            blocks,
        }
    }

    /// Scroll the strip down by `distance` pixels
    fn advance<R: Rng + ?Sized>(&mut self, distance: f32, viewport_height: f32, rng: &mut R) {
        for block in &mut self.blocks {
            block.y += distance;
        }

        while let Some(first) = self.blocks.front().copied() {
            if first.y <= 0.0 {
                break;
            }
            self.blocks.push_front(ScrollBlock {
                y: first.y - self.tile_height,
                variant: pick_variant(self.side, rng),
            });
        }

        while self.blocks.len() > 1 && self.blocks.back().is_some_and(|b| b.y > viewport_height) {
            self.blocks.pop_back();
        }
    }
}

fn pick_variant<R: Rng + ?Sized>(side: StripSide, rng: &mut R) -> u8 {
    match side {
        StripSide::Road => 1,
        StripSide::Left | StripSide::Right => SIDEWAY_VARIANTS
            .choose_weighted(rng, |(_, weight)| *weight)
            .map(|(variant, _)| *variant)
            .unwrap_or(1),
    }
}

/// The road with a roadside strip on each side
#[derive(Debug, Clone, PartialEq)]
pub struct Scenery {
    pub left: ScrollingStrip,
    pub road: ScrollingStrip,
    pub right: ScrollingStrip,
}

impl Scenery {
    pub fn new<R: Rng + ?Sized>(geometry: &RoadGeometry, rng: &mut R) -> Self {
        Self {
            left: ScrollingStrip::new(StripSide::Left, 0.0, SIDEWAY_FOOTPRINT, geometry, rng),
            road: ScrollingStrip::new(
                StripSide::Road,
                geometry.road_x,
                ROAD_FOOTPRINT,
                geometry,
                rng,
            ),
            right: ScrollingStrip::new(
                StripSide::Right,
                geometry.road_x + geometry.road_width,
                SIDEWAY_FOOTPRINT,
                geometry,
                rng,
            ),
        }
    }

    /// Scroll every strip by the distance the player traveled
    pub fn advance<R: Rng + ?Sized>(&mut self, distance: f32, viewport_height: f32, rng: &mut R) {
        for strip in [&mut self.left, &mut self.road, &mut self.right] {
            strip.advance(distance, viewport_height, rng);
        }
    }

    pub fn strips(&self) -> [&ScrollingStrip; 3] {
        [&self.left, &self.road, &self.right]
    }
}
