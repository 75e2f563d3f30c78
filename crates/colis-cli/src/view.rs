// SPDX-License-Identifier: AGPL-3.0
// Colis CLI - Text rendering of the screen summaries

use colis_core::dashboard::{
    progress_percent, DeliveryDashboard, FinanceSummary, HistoryView, HomeSummary,
};
use colis_core::display::initials;
use colis_core::{AppSettings, Parcel, StatusCounts, StatusKind};
use std::fmt;

const MONTHS: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Juin", "Juil", "Aoû", "Sep", "Oct", "Nov", "Déc",
];

pub fn zones(listing: &[(&str, &[&str])]) {
    for (commune, quartiers) in listing {
        println!("{} ({} quartiers)", commune, quartiers.len());
        for quartier in quartiers.iter() {
            println!("  - {}", quartier);
        }
    }
}

fn parcel_line(parcel: &Parcel) {
    println!(
        "  {:<12} {:<24} {:<12} {}",
        parcel.tracking_number,
        parcel.name,
        parcel.status.label(),
        parcel.created_at.format("%d/%m/%Y %H:%M")
    );
}

fn counts<S: StatusKind>(counts: &StatusCounts<S>) {
    for (status, count) in counts.iter() {
        println!("  {:<12} {}", status.label(), count);
    }
    if counts.unrecognized > 0 {
        println!("  {:<12} {}", "Autre", counts.unrecognized);
    }
    println!("  {:<12} {}", "Total", counts.total);
}

pub fn home(summary: &HomeSummary) {
    println!("Colis récents");
    if summary.recent.is_empty() {
        println!("  Aucun colis");
    }
    summary.recent.iter().for_each(parcel_line);

    println!("\nEn transit");
    match &summary.in_transit {
        Some(parcel) => parcel_line(parcel),
        None => println!("  Aucun colis en transit"),
    }

    println!("\nLivrés récemment");
    if summary.delivered.is_empty() {
        println!("  Aucun colis livré");
    }
    summary.delivered.iter().for_each(parcel_line);
}

pub fn history(label: &str, history: &HistoryView) {
    println!("Historique - {}", label);
    counts(&history.counts);
    println!();
    for parcel in &history.parcels {
        println!(
            "  {:<12} {:<24} {:<12} {:>3}%",
            parcel.tracking_number,
            parcel.name,
            parcel.status.label(),
            progress_percent(&parcel.status)
        );
    }
}

pub fn finances(label: &str, summary: &FinanceSummary) {
    println!("Finances - {}", label);
    println!("  {:<12} {}", "Payé", summary.paid);
    println!("  {:<12} {}", "Impayé", summary.unpaid);
    println!("  {:<12} {}", "Total", summary.total);
    println!();
    println!("  {:<12} {}", "En transit", summary.in_transit);
    println!("  {:<12} {}", "Terminé", summary.completed);
    println!("  {:<12} {}", "Annulé", summary.cancelled);
}

pub fn dashboard(label: &str, dashboard: &DeliveryDashboard) {
    println!("Livraisons - {}", label);
    counts(&dashboard.counts);
    println!("  {:<12} {}", "Frais perçus", dashboard.door_fees_collected);
}

pub fn monthly_chart<T: fmt::Display>(year: i32, months: &[T; 12]) {
    println!("\n{}", year);
    for (name, value) in MONTHS.iter().zip(months) {
        println!("  {:<5} {}", name, value);
    }
}

pub fn parcel(parcel: &Parcel) {
    println!("{} - {}", parcel.tracking_number, parcel.name);
    println!(
        "  Statut       {} ({}%)",
        parcel.status.label(),
        progress_percent(&parcel.status)
    );
    if let Some(category) = parcel.category {
        println!("  Type         {}", category);
    }
    if !parcel.description.is_empty() {
        println!("  Description  {}", parcel.description);
    }
    println!("  Départ       {}", parcel.sender);
    println!("  Arrivée      {}", parcel.recipient);
    if let Some(name) = &parcel.recipient_name {
        println!(
            "  Destinataire {} [{}] {}",
            name,
            initials(name),
            parcel.recipient_phone.as_deref().unwrap_or("")
        );
    }
    if let Some(at) = parcel.pickup_at {
        println!("  Ramassage    {}", at.format("%d/%m/%Y %H:%M"));
    }
    if let Some(at) = parcel.dropoff_at {
        println!("  Livraison    {}", at.format("%d/%m/%Y %H:%M"));
    }
    let door_fees = parcel.door_fees();
    if door_fees.is_positive() {
        println!("  À percevoir  {}", door_fees);
    }
    for item in &parcel.items {
        let destination = item
            .destination
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        println!(
            "    - {} {} {}",
            destination,
            item.recipient_name.as_deref().unwrap_or(""),
            item.door_fee.map(|fee| fee.to_string()).unwrap_or_default()
        );
    }
    println!("  Créé le      {}", parcel.created_at.format("%d/%m/%Y %H:%M"));
}

pub fn settings(settings: &AppSettings, path: &str) {
    println!("Fichier       {}", path);
    println!("Serveur       {}", settings.api_base_url);
    println!(
        "Délai         {} s (connexion {} s)",
        settings.request_timeout_secs, settings.connect_timeout_secs
    );
    println!("Période       {}", settings.default_range.label());
}
