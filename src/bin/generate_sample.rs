//! Writes a synthetic `sample_cases.csv` source with the panel's columns.
//!
//! Point `source_path` in `recovery-panel.json` at the output to try the
//! panel without the real spreadsheet.

use anyhow::{Context, Result};

/// Minimal deterministic PRNG (splitmix64).
struct SplitMix(u64);

impl SplitMix {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }

    fn chance(&mut self, percent: usize) -> bool {
        self.below(100) < percent
    }
}

const COURTS: [(&str, &str, &[&str]); 4] = [
    ("TRT 2ª Região", "SP", &["São Paulo", "Guarulhos", "Osasco"]),
    ("TRT 15ª Região", "SP", &["Campinas", "Ribeirão Preto"]),
    ("TRT 1ª Região", "RJ", &["Rio de Janeiro", "Niterói"]),
    ("TRT 3ª Região", "MG", &["Belo Horizonte", "Uberlândia"]),
];

const DEFENDANTS: [&str; 8] = [
    "Banco Horizonte S.A.",
    "Transportes Rápido Ltda",
    "Metalúrgica Aurora",
    "Supermercados Bom Preço",
    "Construtora Pilar",
    "Telecom Brasil Norte",
    " banco horizonte s.a. ",
    "Hospital São Lucas",
];

const CLAIMANTS: [&str; 6] = [
    "Ana Souza",
    "Bruno Lima",
    "Carla Mendes",
    "Diego Alves",
    "Elisa Rocha",
    "Fábio Nunes",
];

fn main() -> Result<()> {
    let mut rng = SplitMix(42);
    let output_path = "sample_cases.csv";
    let mut writer = csv::Writer::from_path(output_path).context("creating sample CSV")?;

    writer.write_record([
        "Processo",
        "Nome Reclamado",
        "Nome Reclamante",
        "nome_tribunal",
        "UF",
        "Comarca",
        "ano_base",
        "Saldo int",
        "Valor Depósito Original Float",
        "cnj_ok",
        "doc_ok",
    ])?;

    let rows = 500;
    for i in 0..rows {
        let (court, uf, counties) = COURTS[rng.below(COURTS.len())];
        let year = 2005 + rng.below(19);
        // Some rows carry an unparseable year, as the real exports do.
        let year = if rng.chance(3) {
            "s/d".to_string()
        } else {
            year.to_string()
        };
        let balance = (rng.below(5_000_000) as f64) / 100.0;
        let deposit = balance * (0.4 + rng.below(60) as f64 / 100.0);

        writer.write_record([
            format!(
                "{:07}-{:02}.{}.5.02.{:04}",
                i,
                rng.below(100),
                2000 + rng.below(24),
                rng.below(10_000)
            ),
            rng.pick(&DEFENDANTS).to_string(),
            rng.pick(&CLAIMANTS).to_string(),
            // Mixed case and padding exercise the loader's normalization.
            if rng.chance(20) {
                format!(" {} ", court.to_lowercase())
            } else {
                court.to_string()
            },
            if rng.chance(20) {
                uf.to_lowercase()
            } else {
                uf.to_string()
            },
            rng.pick(counties).to_string(),
            year,
            format!("{balance:.2}"),
            format!("{deposit:.2}"),
            rng.chance(70).to_string(),
            rng.chance(85).to_string(),
        ])?;
    }
    writer.flush().context("flushing sample CSV")?;

    println!("Wrote {rows} synthetic cases to {output_path}");
    Ok(())
}
