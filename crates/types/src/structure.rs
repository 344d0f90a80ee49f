//! Structural comparison between snapshots.

use crate::Snapshot;
use thiserror::Error;

/// Errors while comparing structures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    /// No atoms of the selected residue were found.
    #[error("No heavy atoms found for residue {0}")]
    NoAtoms(String),

    /// The two structures select a different number of atoms.
    #[error("Atom count mismatch: {reference} in reference, {other} in structure")]
    AtomCountMismatch {
        /// Atoms in the reference.
        reference: usize,
        /// Atoms in the compared structure.
        other: usize,
    },
}

/// Geometry between structures.
pub trait StructuralComparator: Send + Sync {
    /// Distance between two structures, e.g. RMSD. Zero means identical.
    fn distance(&self, reference: &Snapshot, other: &Snapshot) -> Result<f64, StructureError>;

    /// A representative point of one structure, e.g. its center of mass.
    fn center(&self, structure: &Snapshot) -> Result<[f64; 3], StructureError>;
}

/// Compares the heavy atoms of one residue (typically a ligand).
///
/// RMSD is computed without superposition, which is what you want for a
/// ligand moving inside a fixed receptor frame.
#[derive(Clone, Debug)]
pub struct LigandComparator {
    resname: String,
}

impl LigandComparator {
    /// Compare atoms of the residue named `resname`.
    pub fn new(resname: impl Into<String>) -> Self {
        Self {
            resname: resname.into(),
        }
    }

    /// Residue name being compared.
    pub fn resname(&self) -> &str {
        &self.resname
    }

    fn heavy_atoms(&self, structure: &Snapshot) -> Result<Vec<[f64; 3]>, StructureError> {
        let atoms: Vec<[f64; 3]> = structure
            .as_str()
            .lines()
            .filter(|line| line.starts_with("ATOM") || line.starts_with("HETATM"))
            .filter(|line| field(line, 17, 20) == Some(self.resname.as_str()))
            .filter(|line| !is_hydrogen(line))
            .filter_map(coordinates)
            .collect();

        if atoms.is_empty() {
            return Err(StructureError::NoAtoms(self.resname.clone()));
        }
        Ok(atoms)
    }
}

impl StructuralComparator for LigandComparator {
    fn distance(&self, reference: &Snapshot, other: &Snapshot) -> Result<f64, StructureError> {
        let a = self.heavy_atoms(reference)?;
        let b = self.heavy_atoms(other)?;
        if a.len() != b.len() {
            return Err(StructureError::AtomCountMismatch {
                reference: a.len(),
                other: b.len(),
            });
        }

        let sum: f64 = a
            .iter()
            .zip(&b)
            .map(|(p, q)| (0..3).map(|k| (p[k] - q[k]).powi(2)).sum::<f64>())
            .sum();
        Ok((sum / a.len() as f64).sqrt())
    }

    fn center(&self, structure: &Snapshot) -> Result<[f64; 3], StructureError> {
        let atoms = self.heavy_atoms(structure)?;
        let n = atoms.len() as f64;
        let mut center = [0.0; 3];
        for atom in &atoms {
            for k in 0..3 {
                center[k] += atom[k];
            }
        }
        Ok(center.map(|c| c / n))
    }
}

/// Trimmed fixed-width PDB field, 0-based half-open columns.
fn field(line: &str, start: usize, end: usize) -> Option<&str> {
    line.get(start..end.min(line.len())).map(str::trim)
}

fn is_hydrogen(line: &str) -> bool {
    match field(line, 76, 78) {
        Some(element) if !element.is_empty() => element == "H",
        _ => field(line, 12, 16).is_some_and(|name| name.starts_with('H')),
    }
}

fn coordinates(line: &str) -> Option<[f64; 3]> {
    let x = field(line, 30, 38)?.parse().ok()?;
    let y = field(line, 38, 46)?.parse().ok()?;
    let z = field(line, 46, 54)?.parse().ok()?;
    Some([x, y, z])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(name: &str, resname: &str, x: f64, y: f64, z: f64, element: &str) -> String {
        format!(
            "HETATM    1 {:<4} {:>3} L   1    {:>8.3}{:>8.3}{:>8.3}  1.00  0.00          {:>2}\n",
            name, resname, x, y, z, element
        )
    }

    fn ligand(offset: f64) -> Snapshot {
        let mut text = String::new();
        text.push_str(&atom("C1", "LIG", 0.0 + offset, 0.0, 0.0, "C"));
        text.push_str(&atom("C2", "LIG", 2.0 + offset, 0.0, 0.0, "C"));
        text.push_str(&atom("H1", "LIG", 9.0, 9.0, 9.0, "H"));
        text.push_str(&atom("CA", "ALA", 50.0, 50.0, 50.0, "C"));
        Snapshot::new(text)
    }

    #[test]
    fn test_center_uses_heavy_ligand_atoms() {
        let comparator = LigandComparator::new("LIG");
        let center = comparator.center(&ligand(0.0)).unwrap();
        assert_eq!(center, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_rmsd_of_translation() {
        let comparator = LigandComparator::new("LIG");
        let d = comparator.distance(&ligand(0.0), &ligand(1.5)).unwrap();
        assert!((d - 1.5).abs() < 1e-9);
        assert_eq!(comparator.distance(&ligand(0.0), &ligand(0.0)).unwrap(), 0.0);
    }

    #[test]
    fn test_missing_residue() {
        let comparator = LigandComparator::new("XYZ");
        assert_eq!(
            comparator.center(&ligand(0.0)),
            Err(StructureError::NoAtoms("XYZ".to_string()))
        );
    }
}
