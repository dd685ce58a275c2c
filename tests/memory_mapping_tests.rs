//! Integration tests for memory mapping.
//!
//! These tests verify routing between RAM, ROM and custom devices, the
//! registration errors and how the CPU sees a mapped machine.

use emu6502::{
    BusFault, Device, DeviceError, MappedMemory, MemoryBus, RamDevice, RomDevice, CPU,
};

#[test]
fn test_ram_device_basic_read_write() {
    let mut memory = MappedMemory::new();
    memory
        .add_device(0x0000, Box::new(RamDevice::new(1024)))
        .unwrap();

    memory.write(0x0000, 0x42);
    memory.write(0x0100, 0xAA);
    memory.write(0x03FF, 0xFF);

    assert_eq!(memory.read(0x0000), 0x42);
    assert_eq!(memory.read(0x0100), 0xAA);
    assert_eq!(memory.read(0x03FF), 0xFF);

    // Just past the device
    assert_eq!(memory.read(0x0400), 0xFF);
    assert_eq!(memory.peek(0x0400), None);
}

#[test]
fn test_rom_device_read_only() {
    let mut memory = MappedMemory::new();
    memory
        .add_device(0x8000, Box::new(RomDevice::new(vec![0x01, 0x02, 0x03, 0x04])))
        .unwrap();

    assert_eq!(memory.read(0x8000), 0x01);
    assert_eq!(memory.read(0x8003), 0x04);

    memory.write(0x8000, 0xFF);
    assert_eq!(memory.read(0x8000), 0x01);
    assert_eq!(memory.take_fault(), None, "lenient mapper reports nothing");
}

#[test]
fn test_strict_mapper_reports_first_fault_only() {
    let mut memory = MappedMemory::new().with_strict_writes(true);
    memory
        .add_device(0x8000, Box::new(RomDevice::new(vec![0; 16])))
        .unwrap();

    memory.write(0x8001, 0x10);
    memory.write(0x9000, 0x20);

    assert_eq!(
        memory.take_fault(),
        Some(BusFault::ReadOnlyWrite {
            address: 0x8001,
            value: 0x10
        })
    );
    assert_eq!(memory.take_fault(), None);
}

#[test]
fn test_custom_unmapped_value() {
    let memory = MappedMemory::new().with_unmapped_value(0x00);
    assert_eq!(memory.read(0x1234), 0x00);
}

#[test]
fn test_overlapping_devices_rejected() {
    let mut memory = MappedMemory::new();
    memory
        .add_device(0x1000, Box::new(RamDevice::new(256)))
        .unwrap();

    let result = memory.add_device(0x1080, Box::new(RamDevice::new(256)));
    assert_eq!(
        result,
        Err(DeviceError::Overlap {
            new_base: 0x1080,
            new_size: 256,
            existing_base: 0x1000,
            existing_size: 256,
        })
    );

    // Adjacent is fine
    memory
        .add_device(0x1100, Box::new(RamDevice::new(256)))
        .unwrap();
    assert_eq!(memory.device_count(), 2);
}

#[test]
fn test_invalid_sizes_rejected() {
    let mut memory = MappedMemory::new();

    let empty = memory.add_device(0x1000, Box::new(RamDevice::new(0)));
    assert!(matches!(empty, Err(DeviceError::InvalidSize { size: 0, .. })));

    let too_long = memory.add_device(0xFF00, Box::new(RamDevice::new(0x200)));
    assert!(matches!(too_long, Err(DeviceError::InvalidSize { .. })));

    // Exactly to the top of memory
    memory
        .add_device(0xFF00, Box::new(RamDevice::new(0x100)))
        .unwrap();
    memory.write(0xFFFF, 0x5A);
    assert_eq!(memory.read(0xFFFF), 0x5A);
}

#[test]
fn test_full_address_space_device() {
    let mut memory = MappedMemory::new();
    memory
        .add_device(0x0000, Box::new(RamDevice::new(0x1_0000)))
        .unwrap();

    memory.write(0x0000, 1);
    memory.write(0xFFFF, 2);
    assert_eq!(memory.read(0x0000), 1);
    assert_eq!(memory.read(0xFFFF), 2);
}

#[test]
fn test_reset_clears_ram_keeps_rom() {
    let mut memory = MappedMemory::new();
    memory
        .add_device(0x0000, Box::new(RamDevice::new(0x100)))
        .unwrap();
    memory
        .add_device(0xF000, Box::new(RomDevice::new(vec![0xAB; 0x100])))
        .unwrap();

    memory.write(0x0010, 0x77);
    MemoryBus::reset(&mut memory);

    assert_eq!(memory.read(0x0010), 0x00);
    assert_eq!(memory.read(0xF010), 0xAB);
}

/// Counts the writes it receives.
struct WriteCounter {
    writes: u32,
}

impl Device for WriteCounter {
    fn read(&self, _offset: u16) -> u8 {
        self.writes as u8
    }

    fn write(&mut self, _offset: u16, _value: u8) {
        self.writes += 1;
    }

    fn size(&self) -> u32 {
        4
    }
}

#[test]
fn test_cpu_on_mapped_memory() {
    let mut rom = vec![0xEA; 0x4000];
    // LDA #$01 ; STA $6000 ; STA $6003 ; LDX $6001 ; STA $0200
    let program = [
        0xA9, 0x01, 0x8D, 0x00, 0x60, 0x8D, 0x03, 0x60, 0xAE, 0x01, 0x60, 0x8D, 0x00, 0x02,
    ];
    rom[..program.len()].copy_from_slice(&program);
    rom[0x3FFC] = 0x00;
    rom[0x3FFD] = 0xC0;

    let mut memory = MappedMemory::new();
    memory
        .add_device(0x0000, Box::new(RamDevice::new(0x4000)))
        .unwrap();
    memory
        .add_device(0x6000, Box::new(WriteCounter { writes: 0 }))
        .unwrap();
    memory
        .add_device(0xC000, Box::new(RomDevice::new(rom)))
        .unwrap();

    let mut cpu = CPU::new(memory);
    assert_eq!(cpu.pc(), 0xC000);

    for _ in 0..5 {
        cpu.step().unwrap();
    }

    assert_eq!(cpu.x(), 2, "device saw both writes");
    assert_eq!(cpu.memory().read(0x0200), 0x01);
}
