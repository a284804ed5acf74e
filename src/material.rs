//! Material property profiles for host rock and intruded magma.
//!
//! A closed set of material kinds, each with a static property profile.
//! The solid and melt conductivities of the host profile are the two
//! endpoints of the per-cell effective-conductivity blend.

use crate::constants::{
    HOST_ROCK_CONDUCTIVITY_W_M_K, HOST_ROCK_DENSITY_KG_M3, HOST_ROCK_SPECIFIC_HEAT_J_PER_KG_K,
    LATENT_HEAT_FUSION_J_PER_KG, MAGMA_CONDUCTIVITY_W_M_K, MAGMA_DENSITY_KG_M3,
    MAGMA_SPECIFIC_HEAT_J_PER_KG_K,
};
use once_cell::sync::Lazy;
use std::collections::HashMap;

#[derive(Hash, Eq, PartialEq, Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum MaterialKind {
    Granitic = 0, // Continental upper crust - the default host rock
    Basaltic = 1, // Oceanic crust / solidified basaltic intrusions
}

#[derive(Clone, Copy, Debug)]
pub struct MaterialProfile {
    pub kind: MaterialKind,
    pub density_kg_m3: f64,
    pub specific_heat_j_per_kg_k: f64,
    /// Conductivity of the fully crystallized rock
    pub conductivity_solid_w_m_k: f64,
    /// Conductivity of the fully molten material
    pub conductivity_melt_w_m_k: f64,
    pub latent_heat_fusion_j_per_kg: f64,
}

impl MaterialProfile {
    /// Thermal diffusivity of the solid rock, k/(ρ·cp), in m²/s. This is
    /// the diffusivity the stability bound is computed against.
    pub fn diffusivity_solid_m2_s(&self) -> f64 {
        self.conductivity_solid_w_m_k / (self.density_kg_m3 * self.specific_heat_j_per_kg_k)
    }
}

/// Property profiles for each material kind.
pub static MATERIAL_PROFILES: Lazy<HashMap<MaterialKind, MaterialProfile>> = Lazy::new(|| {
    let mut m = HashMap::new();

    m.insert(
        MaterialKind::Granitic,
        MaterialProfile {
            kind: MaterialKind::Granitic,
            density_kg_m3: HOST_ROCK_DENSITY_KG_M3,
            specific_heat_j_per_kg_k: HOST_ROCK_SPECIFIC_HEAT_J_PER_KG_K,
            conductivity_solid_w_m_k: HOST_ROCK_CONDUCTIVITY_W_M_K,
            conductivity_melt_w_m_k: MAGMA_CONDUCTIVITY_W_M_K,
            latent_heat_fusion_j_per_kg: LATENT_HEAT_FUSION_J_PER_KG,
        },
    );

    m.insert(
        MaterialKind::Basaltic,
        MaterialProfile {
            kind: MaterialKind::Basaltic,
            density_kg_m3: MAGMA_DENSITY_KG_M3,
            specific_heat_j_per_kg_k: MAGMA_SPECIFIC_HEAT_J_PER_KG_K,
            conductivity_solid_w_m_k: 2.0,
            conductivity_melt_w_m_k: MAGMA_CONDUCTIVITY_W_M_K,
            latent_heat_fusion_j_per_kg: LATENT_HEAT_FUSION_J_PER_KG,
        },
    );

    m
});

/// Profile lookup. The kind set is closed, so the entry always exists.
pub fn profile(kind: MaterialKind) -> &'static MaterialProfile {
    MATERIAL_PROFILES
        .get(&kind)
        .expect("every material kind has a registered profile")
}
