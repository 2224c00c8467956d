// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Public Key Accelerator (PKA)
//!
//! The PKA is a big integer engine with a 2 KiB operand RAM. Operands are
//! addressed through four vector pointers (A, B, C, D) holding word offsets
//! into that RAM. Simple arithmetic is executed directly by the engine,
//! modular inversion, modular exponentiation and the elliptic curve point
//! operations are run by its internal sequencer.
//!
//! Completion is signalled by the `RUN` bit in `FUNCTION` clearing, and by
//! the PKA interrupt which the chip routes to `handle_interrupt()`.
//!
//! This driver only implements register access. Request arbitration and
//! operand layout are done by the hardware independent driver in
//! `capsules-pka`.

use core::cmp::Ordering;

use kernel::debug_verbose;
use kernel::hil::pka::{self, EngineConfig, Operation, Status, Vectors};
use kernel::utilities::cells::OptionalCell;
use kernel::utilities::registers::interfaces::{Readable, Writeable};
use kernel::utilities::registers::{
    register_bitfields, register_structs, LocalRegisterCopy, ReadOnly, ReadWrite,
};
use kernel::utilities::StaticRef;

const PKA_RAM_ADDR: usize = 0x4400_6000;
const PKA_RAM_WORDS: usize = 512;

pub const PKA_BASE: StaticRef<PkaRegisters> =
    unsafe { StaticRef::new(0x4400_4000 as *const PkaRegisters) };

pub const PKA_RAM_BASE: StaticRef<PkaRam> =
    unsafe { StaticRef::new(PKA_RAM_ADDR as *const PkaRam) };

/// Arena location and operand limits of the CC2538 PKA.
pub const PKA_CONFIG: EngineConfig = EngineConfig {
    ram_base: PKA_RAM_ADDR,
    ram_words: PKA_RAM_WORDS,
    max_operand_words: pka::MAX_OPERAND_WORDS,
};

register_structs! {
    pub PkaRegisters {
        /// Vector A address
        (0x00 => aptr: ReadWrite<u32, PTR::Register>),
        /// Vector B address
        (0x04 => bptr: ReadWrite<u32, PTR::Register>),
        /// Vector C address
        (0x08 => cptr: ReadWrite<u32, PTR::Register>),
        /// Vector D address
        (0x0C => dptr: ReadWrite<u32, PTR::Register>),
        /// Vector A length, in words
        (0x10 => alength: ReadWrite<u32, LENGTH::Register>),
        /// Vector B length, in words
        (0x14 => blength: ReadWrite<u32, LENGTH::Register>),
        /// Bit shift value. Written by the sequencer with a result code
        /// after ECC operations.
        (0x18 => shift: ReadWrite<u32>),
        /// Operation select and run control
        (0x1C => function: ReadWrite<u32, FUNCTION::Register>),
        /// Result of the last compare
        (0x20 => compare: ReadOnly<u32, COMPARE::Register>),
        /// Most significant word of the last result
        (0x24 => msw: ReadOnly<u32, MSW::Register>),
        /// Most significant word of the last remainder
        (0x28 => divmsw: ReadOnly<u32, MSW::Register>),
        (0x2C => _reserved0),
        (0x100 => @END),
    }
}

register_structs! {
    pub PkaRam {
        (0x000 => words: [ReadWrite<u32>; 512]),
        (0x800 => @END),
    }
}

register_bitfields![u32,
    PTR [
        /// Word offset into the PKA RAM
        ADDR OFFSET(0) NUMBITS(11) []
    ],
    LENGTH [
        LEN OFFSET(0) NUMBITS(9) []
    ],
    FUNCTION [
        MULTIPLY OFFSET(0) NUMBITS(1) [],
        ADDSUB OFFSET(1) NUMBITS(1) [],
        MS_ONE OFFSET(3) NUMBITS(1) [],
        ADD OFFSET(4) NUMBITS(1) [],
        SUBTRACT OFFSET(5) NUMBITS(1) [],
        RSHIFT OFFSET(6) NUMBITS(1) [],
        LSHIFT OFFSET(7) NUMBITS(1) [],
        DIVIDE OFFSET(8) NUMBITS(1) [],
        MODULO OFFSET(9) NUMBITS(1) [],
        COMPARE OFFSET(10) NUMBITS(1) [],
        COPY OFFSET(11) NUMBITS(1) [],
        /// Operations executed by the sequencer
        SEQUENCER_OPERATIONS OFFSET(12) NUMBITS(3) [
            None = 0,
            ExpModCrt = 1,
            ExpModAct4 = 2,
            EccAdd = 3,
            ExpModAct2 = 4,
            EccMultiply = 5,
            ExpModVariable = 6,
            ModInv = 7
        ],
        /// Set to start, cleared by hardware on completion
        RUN OFFSET(15) NUMBITS(1) [],
        STALL_RESULT OFFSET(24) NUMBITS(1) []
    ],
    COMPARE [
        A_EQUALS_B OFFSET(0) NUMBITS(1) [],
        A_LESS_THAN_B OFFSET(1) NUMBITS(1) [],
        A_GREATER_THAN_B OFFSET(2) NUMBITS(1) []
    ],
    MSW [
        /// Word offset of the most significant nonzero result word
        MSW_ADDRESS OFFSET(0) NUMBITS(11) [],
        RESULT_IS_ZERO OFFSET(15) NUMBITS(1) []
    ]
];

/// Encode `operation` as a `FUNCTION` register value with `RUN` set.
fn function_value(operation: Operation) -> u32 {
    let mut function: LocalRegisterCopy<u32, FUNCTION::Register> = LocalRegisterCopy::new(0);
    function.modify(match operation {
        Operation::Add => FUNCTION::ADD::SET,
        Operation::Subtract => FUNCTION::SUBTRACT::SET,
        Operation::Multiply => FUNCTION::MULTIPLY::SET,
        Operation::Divide => FUNCTION::DIVIDE::SET,
        Operation::Modulo => FUNCTION::MODULO::SET,
        Operation::Compare => FUNCTION::COMPARE::SET,
        Operation::ModularInverse => FUNCTION::SEQUENCER_OPERATIONS::ModInv,
        Operation::ModularExponentiation => FUNCTION::SEQUENCER_OPERATIONS::ExpModAct2,
        Operation::EccMultiply => FUNCTION::SEQUENCER_OPERATIONS::EccMultiply,
        Operation::EccAdd => FUNCTION::SEQUENCER_OPERATIONS::EccAdd,
    });
    function.modify(FUNCTION::RUN::SET);
    function.get()
}

fn decode_compare(value: u32) -> Option<Ordering> {
    let compare: LocalRegisterCopy<u32, COMPARE::Register> = LocalRegisterCopy::new(value);
    if compare.is_set(COMPARE::A_EQUALS_B) {
        Some(Ordering::Equal)
    } else if compare.is_set(COMPARE::A_LESS_THAN_B) {
        Some(Ordering::Less)
    } else if compare.is_set(COMPARE::A_GREATER_THAN_B) {
        Some(Ordering::Greater)
    } else {
        None
    }
}

pub struct Pka<'a> {
    registers: StaticRef<PkaRegisters>,
    ram: StaticRef<PkaRam>,
    client: OptionalCell<&'a dyn pka::Client>,
}

impl Pka<'_> {
    pub const fn new() -> Self {
        Pka {
            registers: PKA_BASE,
            ram: PKA_RAM_BASE,
            client: OptionalCell::empty(),
        }
    }

    pub fn handle_interrupt(&self) {
        if self.registers.function.is_set(FUNCTION::RUN) {
            // Spurious, the sequencer is still busy
            return;
        }

        debug_verbose!("pka: operation complete, msw {:#x}", self.registers.msw.get());
        self.client.map(|client| client.operation_done());
    }
}

impl<'a> pka::Engine<'a> for Pka<'a> {
    fn config(&self) -> EngineConfig {
        PKA_CONFIG
    }

    fn write_words(&self, offset: usize, words: &[u32]) {
        for (register, word) in self.ram.words.iter().skip(offset).zip(words.iter()) {
            register.set(*word);
        }
    }

    fn zero_words(&self, offset: usize, len: usize) {
        for register in self.ram.words.iter().skip(offset).take(len) {
            register.set(0);
        }
    }

    fn read_words(&self, offset: usize, words: &mut [u32]) {
        for (word, register) in words.iter_mut().zip(self.ram.words.iter().skip(offset)) {
            *word = register.get();
        }
    }

    fn set_vectors(&self, vectors: Vectors) {
        self.registers.aptr.write(PTR::ADDR.val(vectors.a as u32));
        self.registers.bptr.write(PTR::ADDR.val(vectors.b as u32));
        self.registers.cptr.write(PTR::ADDR.val(vectors.c as u32));
        self.registers.dptr.write(PTR::ADDR.val(vectors.d as u32));
    }

    fn set_lengths(&self, a_len: usize, b_len: usize) {
        self.registers.alength.write(LENGTH::LEN.val(a_len as u32));
        self.registers.blength.write(LENGTH::LEN.val(b_len as u32));
    }

    fn set_shift(&self, shift: u32) {
        self.registers.shift.set(shift);
    }

    fn launch(&self, operation: Operation) {
        self.registers.function.set(function_value(operation));
    }

    fn is_running(&self) -> bool {
        self.registers.function.is_set(FUNCTION::RUN)
    }

    fn status(&self) -> Status {
        Status {
            result_is_zero: self.registers.msw.is_set(MSW::RESULT_IS_ZERO),
            msw_address: self.registers.msw.read(MSW::MSW_ADDRESS) as usize,
            remainder_is_zero: self.registers.divmsw.is_set(MSW::RESULT_IS_ZERO),
            remainder_msw_address: self.registers.divmsw.read(MSW::MSW_ADDRESS) as usize,
            compare: decode_compare(self.registers.compare.get()),
            ecc_fault: self.registers.shift.get(),
        }
    }

    fn set_client(&self, client: &'a dyn pka::Client) {
        self.client.set(client);
    }
}
