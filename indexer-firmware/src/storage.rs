//! Configuration storage in flash
//!
//! Uses sequential-storage for wear-leveled key-value storage in the last
//! 64KB of flash. The only item is the postcard form of the active
//! [`IndexerConfig`].

use core::ops::Range;

use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use sequential_storage::cache::NoCache;
use sequential_storage::map;

use indexer_core::config::{ConfigError, IndexerConfig, MAX_STORED_SIZE};

/// 2MB flash on the co-processor board
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;
/// Must match the region memory.x leaves out of FLASH
pub const CONFIG_PARTITION_SIZE: usize = 64 * 1024;
pub const CONFIG_PARTITION_START: usize = FLASH_SIZE - CONFIG_PARTITION_SIZE;

const CONFIG_RANGE: Range<u32> = (CONFIG_PARTITION_START as u32)..(FLASH_SIZE as u32);

/// Key of the stored [`IndexerConfig`]
const CONFIG_KEY: u8 = 0;

/// Scratch for one map item: key, length header and value
const ITEM_BUFFER_SIZE: usize = MAX_STORED_SIZE + 32;

/// Errors from flash storage
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Map operation failed
    Storage,
    /// Item larger than the read buffer
    BufferTooSmall,
    /// Config could not be packed
    Config(ConfigError),
}

pub struct ConfigStorage<'d> {
    flash: Flash<'d, FLASH, Async, FLASH_SIZE>,
}

impl<'d> ConfigStorage<'d> {
    pub fn new(flash: Peri<'d, FLASH>, dma: Peri<'d, impl Channel>) -> Self {
        Self {
            flash: Flash::new(flash, dma),
        }
    }

    /// Copy the stored config bytes into `buffer`
    ///
    /// Returns `Ok(None)` when nothing was stored yet.
    pub async fn read<'b>(
        &mut self,
        buffer: &'b mut [u8; MAX_STORED_SIZE],
    ) -> Result<Option<&'b [u8]>, StorageError> {
        let mut item_buffer = [0u8; ITEM_BUFFER_SIZE];

        let item = map::fetch_item::<u8, &[u8], _>(
            &mut self.flash,
            CONFIG_RANGE,
            &mut NoCache::new(),
            &mut item_buffer,
            &CONFIG_KEY,
        )
        .await
        .map_err(|_| StorageError::Storage)?;

        let Some(data) = item else {
            return Ok(None);
        };
        let len = data.len();
        buffer
            .get_mut(..len)
            .ok_or(StorageError::BufferTooSmall)?
            .copy_from_slice(data);
        Ok(Some(&buffer[..len]))
    }

    /// Replace the stored config
    pub async fn write(&mut self, config: &IndexerConfig) -> Result<(), StorageError> {
        let mut packed = [0u8; MAX_STORED_SIZE];
        let data: &[u8] = config
            .to_postcard(&mut packed)
            .map_err(StorageError::Config)?;
        let mut item_buffer = [0u8; ITEM_BUFFER_SIZE];

        map::store_item(
            &mut self.flash,
            CONFIG_RANGE,
            &mut NoCache::new(),
            &mut item_buffer,
            &CONFIG_KEY,
            &data,
        )
        .await
        .map_err(|_| StorageError::Storage)
    }
}
