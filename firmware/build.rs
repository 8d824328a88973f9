// SPDX-FileCopyrightText: 2026 Sentair Labs <hello@sentair.dev>
// SPDX-License-Identifier: GPL-3.0-or-later

//! This build script generates the `memory.x` linker script into a
//! directory where the linker can always find it at build time, and
//! requests a rebuild whenever it would change. The flash origin skips
//! the S112 SoftDevice image; the RAM origin skips the SoftDevice's
//! runtime allocation for this firmware's GATT configuration.

use std::env;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

fn main() {
    let out = &PathBuf::from(env::var_os("OUT_DIR").unwrap());

    /* S112 7.3.0 occupies flash up to 0x19000 (MBR included). */
    let app_flash_origin = 0x19000u32;
    /* The SoftDevice's minimal RAM requirement is 4.4K (0x1198) plus */
    /* the attribute table and one connection; 10648 bytes (0x2998) of */
    /* headroom covers this firmware's configuration. */
    let soft_device_ram_reserved = 10648u32;

    let memory_x_content = format!(
        r##"
        MEMORY
        {{
            /* NOTE 1 K = 1 KiBi = 1024 bytes */
            FLASH (rx) : ORIGIN = 0x00000000 + {:#X}, LENGTH = 512K - {:#X}
            RAM : ORIGIN = 0x20000000 + {}, LENGTH = 64K - {}
        }}
        "##,
        app_flash_origin, app_flash_origin, soft_device_ram_reserved, soft_device_ram_reserved
    );
    File::create(out.join("./memory.x"))
        .unwrap()
        .write_all(memory_x_content.as_bytes())
        .unwrap();

    println!("cargo:rustc-link-search={}", out.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}
