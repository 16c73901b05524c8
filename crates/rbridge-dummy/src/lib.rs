//! rbridge-dummy - In-memory bridge emulator for testing
//!
//! Emulates a target with sparse paged memory so commands can be exercised
//! without hardware. Every trait call is journaled by name, which lets
//! tests assert which operations ran and in which order.

use rbridge_core::bridge::{Bridge, Status};
use rbridge_core::error::{Error, Result};
use std::collections::HashMap;
use std::path::PathBuf;

const PAGE_SIZE: u64 = 4096;

/// Dummy bridge backed by sparse in-memory pages.
///
/// Unwritten memory reads as zero. `load` places each configured binary as
/// a raw image at address 0; execution control just flips a running flag.
pub struct DummyBridge {
    pages: HashMap<u64, Box<[u8]>>,
    binaries: Vec<PathBuf>,
    journal: Vec<&'static str>,
    running: bool,
}

impl DummyBridge {
    /// Create a dummy bridge that will load the given binaries
    pub fn new(binaries: Vec<PathBuf>) -> Self {
        Self {
            pages: HashMap::new(),
            binaries,
            journal: Vec::new(),
            running: false,
        }
    }

    /// Names of the operations performed so far, in order
    pub fn journal(&self) -> &[&'static str] {
        &self.journal
    }

    /// True if `start` ran more recently than `wait`/`reset`
    pub fn is_running(&self) -> bool {
        self.running
    }

    fn page_mut(&mut self, page: u64) -> &mut Box<[u8]> {
        self.pages
            .entry(page)
            .or_insert_with(|| vec![0u8; PAGE_SIZE as usize].into_boxed_slice())
    }

    fn copy_in(&mut self, addr: u64, data: &[u8]) {
        let mut offset = 0usize;
        while offset < data.len() {
            let cur = addr + offset as u64;
            let page = cur / PAGE_SIZE;
            let in_page = (cur % PAGE_SIZE) as usize;
            let chunk = usize::min(PAGE_SIZE as usize - in_page, data.len() - offset);
            self.page_mut(page)[in_page..in_page + chunk]
                .copy_from_slice(&data[offset..offset + chunk]);
            offset += chunk;
        }
    }

    fn copy_out(&self, addr: u64, buf: &mut [u8]) {
        let mut offset = 0usize;
        while offset < buf.len() {
            let cur = addr + offset as u64;
            let page = cur / PAGE_SIZE;
            let in_page = (cur % PAGE_SIZE) as usize;
            let chunk = usize::min(PAGE_SIZE as usize - in_page, buf.len() - offset);
            match self.pages.get(&page) {
                Some(data) => {
                    buf[offset..offset + chunk].copy_from_slice(&data[in_page..in_page + chunk])
                }
                None => buf[offset..offset + chunk].fill(0),
            }
            offset += chunk;
        }
    }
}

impl Bridge for DummyBridge {
    fn read(&mut self, addr: u64, buf: &mut [u8]) -> Result<()> {
        self.journal.push("read");
        self.copy_out(addr, buf);
        Ok(())
    }

    fn write(&mut self, addr: u64, buf: &[u8]) -> Result<()> {
        self.journal.push("write");
        self.copy_in(addr, buf);
        Ok(())
    }

    fn load(&mut self) -> Result<Status> {
        self.journal.push("load");
        let binaries = self.binaries.clone();
        for path in &binaries {
            let image = std::fs::read(path).map_err(Error::Io)?;
            log::info!(
                "dummy: loaded {} ({} bytes) at 0x0",
                path.display(),
                image.len()
            );
            self.copy_in(0, &image);
        }
        Ok(0)
    }

    fn start(&mut self) -> Result<Status> {
        self.journal.push("start");
        self.running = true;
        log::info!("dummy: target started");
        Ok(0)
    }

    fn wait(&mut self) -> Result<Status> {
        self.journal.push("wait");
        // nothing ever runs, so the wait ends immediately
        self.running = false;
        Ok(0)
    }

    fn reset(&mut self) -> Result<Status> {
        self.journal.push("reset");
        self.running = false;
        log::info!("dummy: target reset");
        Ok(0)
    }

    fn ioloop(&mut self) -> Result<Status> {
        self.journal.push("ioloop");
        log::info!("dummy: ioloop has nothing to relay, returning");
        Ok(0)
    }

    fn reqloop(&mut self) -> Result<Status> {
        self.journal.push("reqloop");
        log::info!("dummy: reqloop has nothing to serve, returning");
        Ok(0)
    }

    fn gdb(&mut self, rsp_port: u16) -> Result<Status> {
        self.journal.push("gdb");
        log::info!("dummy: no RSP session on port {}, returning", rsp_port);
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwritten_memory_reads_zero() {
        let mut bridge = DummyBridge::new(Vec::new());
        let mut buf = [0xAAu8; 8];
        bridge.read(0x2000, &mut buf).unwrap();
        assert_eq!(buf, [0u8; 8]);
    }

    #[test]
    fn test_write_read_roundtrip_le() {
        let mut bridge = DummyBridge::new(Vec::new());
        bridge
            .write(0x1000, &0xdeadbeefu32.to_le_bytes())
            .unwrap();
        let mut buf = [0u8; 4];
        bridge.read(0x1000, &mut buf).unwrap();
        assert_eq!(buf, [0xef, 0xbe, 0xad, 0xde]);
    }

    #[test]
    fn test_access_across_page_boundary() {
        let mut bridge = DummyBridge::new(Vec::new());
        let data: Vec<u8> = (0..64).collect();
        bridge.write(PAGE_SIZE - 32, &data).unwrap();
        let mut buf = [0u8; 64];
        bridge.read(PAGE_SIZE - 32, &mut buf).unwrap();
        assert_eq!(&buf[..], &data[..]);
    }

    #[test]
    fn test_journal_records_operations_in_order() {
        let mut bridge = DummyBridge::new(Vec::new());
        bridge.start().unwrap();
        bridge.wait().unwrap();
        bridge.reset().unwrap();
        assert_eq!(bridge.journal(), ["start", "wait", "reset"]);
        assert!(!bridge.is_running());
    }

    #[test]
    fn test_load_missing_binary_fails() {
        let mut bridge = DummyBridge::new(vec![PathBuf::from("/no/such/file.bin")]);
        assert!(bridge.load().is_err());
    }
}
