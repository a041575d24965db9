// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Spectrum writer, per `SPEC_FULL.md` §4.N / §6. A thin `Write`-trait-object
sink so `-` (stdout) and a real path share one code path, the way the
teacher's solution writers (`mwa_hyperdrive`'s calibration-solution
dumpers) pick their sink once and write through a trait object rather than
branching at every line.
*/

use std::fs::File;
use std::io::{self, BufWriter, Write};

use thiserror::Error;

use crate::cli::Solution;
use crate::pipeline::SpectrumPoint;

#[derive(Error, Debug)]
pub enum WriterError {
    #[error("could not create output file {path}: {source}")]
    Create {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("error writing output: {0}")]
    Write(#[from] io::Error),
}

/// Write the solved spectrum to `output` (`-` for stdout), per §6's two
/// column formats.
pub fn write_spectrum(
    output: &str,
    solution: Solution,
    spectrum: &[SpectrumPoint],
) -> Result<(), WriterError> {
    let mut sink: Box<dyn Write> = if output == "-" {
        Box::new(io::stdout())
    } else {
        let file = File::create(output).map_err(|source| WriterError::Create {
            path: output.to_string(),
            source,
        })?;
        Box::new(BufWriter::new(file))
    };

    match solution {
        Solution::SlantPath => {
            writeln!(sink, "# wavenumber[cm-1]  wavelength[nm]  modulation")?;
            for point in spectrum {
                let wavelength_nm = 1.0e7 / point.wavenumber_cm1;
                writeln!(
                    sink,
                    "{:.8e} {:.8e} {:.8e}",
                    point.wavenumber_cm1, wavelength_nm, point.value
                )?;
            }
        }
        Solution::Eclipse => {
            writeln!(sink, "# wavelength[um]  emergent_intensity[erg/s/cm/sr]")?;
            for point in spectrum {
                let wavelength_um = 1.0e4 / point.wavenumber_cm1;
                writeln!(sink, "{:.8e} {:.8e}", wavelength_um, point.value)?;
            }
        }
    }
    sink.flush()?;
    Ok(())
}
