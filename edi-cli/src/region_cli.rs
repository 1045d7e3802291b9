//! `edi body-map` - symptom analysis for one body region

use anyhow::{bail, Result};
use tracing::debug;

use edi_core::body_map::{BodyMap, BodyRegion, RegionSymptomForm};
use edi_core::locale::StringKey;
use edi_core::EdiError;

use crate::terminal::TerminalSink;
use crate::AppContext;

pub async fn run(ctx: &AppContext, region: &str, symptoms: &[String]) -> Result<()> {
    let region: BodyRegion = region.parse()?;

    let mut map = BodyMap::new();
    map.toggle_region(region);
    debug!(
        "Selected regions: {:?}",
        map.selected_regions().collect::<Vec<_>>()
    );

    let mut form = RegionSymptomForm::new(region);
    for symptom in symptoms {
        if let Err(e) = form.toggle(symptom) {
            bail!("{}\nSymptoms for {}: {}", e, region, region.symptoms().join(", "));
        }
    }

    let sink = TerminalSink::new();
    match form
        .submit(
            ctx.backend.as_ref(),
            &ctx.session_id,
            &ctx.catalog,
            ctx.language(),
            &sink,
        )
        .await
    {
        Ok(analysis) => {
            if !analysis.success {
                bail!("The server could not analyze {} symptoms", region);
            }
            if !analysis.recommendation.is_empty() {
                println!("Recommendation: {}", analysis.recommendation);
            }
            Ok(())
        }
        Err(EdiError::Validation(notice)) => bail!(notice),
        Err(EdiError::Backend(e)) => {
            eprintln!(
                "{}",
                ctx.catalog.text(ctx.language(), StringKey::RegionAnalysisFailed)
            );
            Err(EdiError::Backend(e).into())
        }
        Err(e) => Err(e.into()),
    }
}
