// src/metrics/seed.rs
// Default catalog: energy, water, waste and transport

pub struct DefaultMetric {
    pub name: &'static str,
    /// Name used by catalogs created before the Spanish rename
    pub legacy_name: &'static str,
    pub unit: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub emission_factor: f64,
}

pub const DEFAULT_METRICS: &[DefaultMetric] = &[
    DefaultMetric {
        name: "Energía",
        legacy_name: "Energy",
        unit: "kWh",
        description: "Consumo eléctrico total de las instalaciones.",
        icon: "Zap",
        color: "#FFC107",
        emission_factor: 0.5,
    },
    DefaultMetric {
        name: "Agua",
        legacy_name: "Water",
        unit: "m3",
        description: "Consumo de agua potable y recursos hídricos.",
        icon: "Droplet",
        color: "#2196F3",
        emission_factor: 0.3,
    },
    DefaultMetric {
        name: "Residuos",
        legacy_name: "Waste",
        unit: "kg",
        description: "Generación de desechos sólidos y reciclables.",
        icon: "Trash2",
        color: "#757575",
        emission_factor: 0.1,
    },
    DefaultMetric {
        name: "Transporte",
        legacy_name: "Transport",
        unit: "km",
        description: "Distancia recorrida por flota logística o empleados.",
        icon: "Truck",
        color: "#FF5722",
        emission_factor: 0.2,
    },
];
