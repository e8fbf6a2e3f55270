// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  decode.rs - Blueprint string decoder demo.
 *  Copyright (C) 2026  Forest Crossman <cyrozap@gmail.com>
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use std::io::Read;

use clap::Parser;

use fbpcodec::Blueprint;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The file containing the blueprint string. Reads stdin if omitted.
    file: Option<String>,

    /// Print the string re-encoded in the current format instead of JSON.
    #[arg(long)]
    reencode: bool,
}

fn main() {
    let args = Args::parse();

    let encoded = match &args.file {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(error) => {
                eprintln!("Error opening file {:?}: {:?}", path, error);
                return;
            }
        },
        None => {
            let mut text = String::new();
            if let Err(error) = std::io::stdin().read_to_string(&mut text) {
                eprintln!("Error reading stdin: {:?}", error);
                return;
            }
            text
        }
    };

    let blueprint = match Blueprint::from_encoded(encoded.trim()) {
        Ok(bp) => bp,
        Err(error) => {
            eprintln!("Error decoding blueprint string: {}", error);
            return;
        }
    };

    if args.reencode {
        match blueprint.to_current_encoding() {
            Ok(text) => println!("{}", text),
            Err(error) => eprintln!("Error encoding blueprint: {}", error),
        }
        return;
    }

    let canonical = match blueprint.to_canonical() {
        Ok(value) => value,
        Err(error) => {
            eprintln!("Error converting blueprint: {}", error);
            return;
        }
    };

    match serde_json::to_string_pretty(&canonical) {
        Ok(text) => println!("{}", text),
        Err(error) => eprintln!("Error formatting JSON: {}", error),
    }
}
