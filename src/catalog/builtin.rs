//! Sample programs shipped with the emulator page.
//!
//! Text is kept byte-for-byte as the page presents it, including the
//! inconsistent trailing newlines and tab/space indentation between flavors.

use super::{Flavor, Topic};

const AREA_INTEL: &str = concat!(
    "; Declare length and width\n",
    ".data\n",
    "    long DW 0x40600000\n",
    "    wide DW 0x1B\n",
    "\n",
    "; Calculate area of rectangle\n",
    ".text\n",
    "    mov R7, [long]\n",
    "    imul R6, [wide]\n",
);

const AREA_MIPS_ASM: &str = concat!(
    "; Declare length and width\n",
    ".data\n",
    "\tlong: .float 12.2\n",
    "\twide: .float 12.5\n",
    "\n",
    "; Calc area of rect\n",
    ".text\n",
    "\t0x40000 LWC F8, 0(F28)\n",
    "    0x40004 LWC F10, 4(F28)\n",
    "    0x40008 MULT.S F12, F8, F10",
);

const DATA_INTEL: &str = concat!(
    "; Declare arrays\n",
    ".data\n",
    "    x DB 0x3f99999a, 0x2, 0x40600000, 0x4, 0x5\n",
    "    y DW 0x2, 0x36, 0x3fb33333, 0x8\n",
    "    z DD 0xA DUP (0x32)\n",
    "\n",
    "; Storing values into memory using register arithmetic\n",
    ".text\n",
    "    mov R7, 0x6\n",
    "    mov [R7], [x+0x2]\n",
    "    mov [R7+0x2], [y+0x3]\n",
    "    mov [R6], [z]\n",
    "    mov [R7-0x5], [y+0x2]\n",
    "    mov [-0x5+R7], [y+0x2]",
);

const DATA_MIPS_ASM: &str = concat!(
    "; First comes the data section, where we declare some names.\n",
    ".data\n",
    "    x: .float 8.0\n",
    "    y: .float 10.5\n",
    "    z: .double 20.555\n",
    "\n",
    "; Next is the .text section, where we use them:\n",
    ".text\n",
    "    0x400000 LWC F8, 0(F28)\n",
    "    0x400004 LWC F10, 4(F28)\n",
    "    0x400008 LDC F12, 8(F28)\n",
);

const POWER_INTEL: &str = concat!(
    "; In R7, we put the number to raise to the power we put in R5.\n",
    "      mov R7, 0x40600000\n",
    "      mov R5, 0x3fb33333\n",
    "      call power\n",
    "      mov R4, 0x0\n",
    "      int 0x20\n",
    "\n",
    "power: mov R6, R7\n",
    "loop: imul R7, R6\n",
    "      dec R5\n",
    "      cmp R5, 0x1\n",
    "      jne loop\n",
    "      ret\n",
);

const POWER_MIPS_ASM: &str = concat!(
    "; x is the base, y is the power\n",
    ".data\n",
    "    x: .float 5.5\n",
    "    y: .word 0x3\n",
    "\n",
    "; In F8, we put the number to raise to the power we put in R9.\n",
    ".text\n",
    "      0x400000 LWC F8, 0(F28)\n",
    "      0x400004 LW R9, 4(R28)\n",
    "      0x400008 JAL 0x1000040\n",
    "      0x40000C SYSCALL\n",
    "\n",
    "power: 0x400010 ADD.S F16, F0, F8\n",
    "loop: 0x400014 MULT.S F8, F8, F16\n",
    "      0x400018 ADDI R9, R9, -1\n",
    "      0x40001C ADDI R10, R0, 1\n",
    "      0x400020 BNE R9, R10, -4\n",
    "      0x400024 JR R31",
);

const ADD_TWO_INTEL: &str = concat!(
    "; Declare number and sum.\n",
    ".data\n",
    "    long DW 0x40600000\n",
    "    sum DW ?\n",
    "\n",
    "; Store first number to R7\n",
    "; Add 0x40000 to value in R7\n",
    "; Store total to sum\n",
    ".text\n",
    "    mov R7, [number]\n",
    "    add R7, 0x9E\n",
    "    mov [sum], R7\n",
);

/// `None` when the topic has no program for that flavor.
pub fn sample(topic: Topic, flavor: Flavor) -> Option<&'static str> {
    use Flavor::*;
    use Topic::*;
    let text = match (topic, flavor) {
        (Area, Intel) => AREA_INTEL,
        (Area, MipsAsm) => AREA_MIPS_ASM,
        (Data, Intel) => DATA_INTEL,
        (Data, MipsAsm) => DATA_MIPS_ASM,
        (Power, Intel) => POWER_INTEL,
        (Power, MipsAsm) => POWER_MIPS_ASM,
        (AddTwo, Intel) => ADD_TWO_INTEL,
        (AddTwo, MipsAsm) => return None,
    };
    Some(text)
}
