// SPDX-License-Identifier: AGPL-3.0
// Colis Core - Served communes and their quartiers

/// An administrative commune and the quartiers inside it
#[derive(Debug, Clone, Copy)]
pub struct Commune {
    pub name: &'static str,
    pub quartiers: &'static [&'static str],
}

impl Commune {
    pub fn has_quartier(&self, quartier: &str) -> bool {
        self.quartiers.contains(&quartier)
    }
}

pub const COMMUNES: &[Commune] = &[
    Commune {
        name: "Ratoma",
        quartiers: &[
            "Taouyah",
            "Ratoma Dispensaire",
            "Ratoma Centre",
            "Kaporo Rails",
            "Hamdallaye 1",
            "Hamdallaye 2",
            "Koloma Soloprimo",
            "Kipé",
            "Kaporo Centre",
        ],
    },
    Commune {
        name: "Lambanyi",
        quartiers: &[
            "Nongo-centre",
            "Nongo Taady",
            "Lambanyi",
            "Yembeya",
            "Waréah",
            "Simbaya Gare",
            "Yattaya centre",
            "Nassouroulaye",
            "Bantounka 1",
            "Bantounka 2",
            "Soumambossia",
            "Wanindara",
            "Wanindara Rails",
            "Kinifi",
        ],
    },
    Commune {
        name: "Sonfonia",
        quartiers: &[
            "Kobayah",
            "Yattaya Fossidet",
            "Yattaya centre",
            "Sonfonia Gare 1",
            "Sonfonia Gare 2",
            "Sonfonia Centre 1",
            "Sonfonia Centre 2",
        ],
    },
    Commune {
        name: "Gbessia",
        quartiers: &[
            "Dabondy 1",
            "Dabondy 2",
            "Dabondy 3",
            "Dabondy Ecole",
            "Dabondy Rails",
            "Gbessia Cité 1",
            "Gbessia Cité 2",
            "Gbessia Cité 3",
            "Gbessia Ecole",
            "Gbessia Centre",
            "Gbessia Port 1",
            "Gbessia Port 2",
            "Dar-Es-Salam",
            "Cité de l’air",
            "Béhanzin",
            "Tanènè Marché",
            "Tanènè Mosquée",
            "Yimbaya Ecole",
            "Yimbaya Permanence",
            "Yimbaya Port",
            "Hamdallaye Mosquée",
            "Yimbaya Tannerie",
            "Simbaya 1",
            "Koloma 1",
            "Koloma 2",
            "Nassouroulaye",
        ],
    },
    Commune {
        name: "Matoto",
        quartiers: &[
            "Matato Centre",
            "Simbaya 2",
            "Simbaya Ecole",
            "Matoto Marché",
            "Matoto Khabitaya",
            "Sangoyah Mosquée",
            "Sangoyah Marché",
            "Kissosso",
            "Kissosso Plateau",
            "Marché Enco 5",
            "Wanindara Dispensaire",
            "Wanindara Marché",
        ],
    },
    Commune {
        name: "Tombolia",
        quartiers: &[
            "Enta Marché",
            "Enta Fassa",
            "Tombolia",
            "Tombolia Plateau",
            "Dabompa Village",
            "Dabompa Plateau",
            "Lansanayah",
        ],
    },
];

pub fn find_commune(name: &str) -> Option<&'static Commune> {
    COMMUNES.iter().find(|c| c.name == name)
}

/// Whether `quartier` is a known quartier of `commune`
pub fn is_known_location(commune: &str, quartier: &str) -> bool {
    find_commune(commune).is_some_and(|c| c.has_quartier(quartier))
}
