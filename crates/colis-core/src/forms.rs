// SPDX-License-Identifier: AGPL-3.0
// Colis Core - Request and profile forms
//
// Validation is local and synchronous. A form that fails never reaches the
// network.

use crate::fee::estimate_fee;
use crate::models::{Location, Money, ParcelCategory};
use crate::zones::is_known_location;
use chrono::NaiveDateTime;

const MIN_PHONE_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please select a pickup location.")]
    MissingPickupLocation,

    #[error("Please select a delivery location.")]
    MissingDeliveryLocation,

    #[error("Unknown location: {0}")]
    UnknownLocation(String),

    #[error("Please provide a name for the parcel.")]
    MissingName,

    #[error("Please provide a parcel description.")]
    MissingParcelDescription,

    #[error("Please provide a description for the cargaison.")]
    MissingDescription,

    #[error("Please provide the recipient's name.")]
    MissingRecipientName,

    #[error("Please provide a valid recipient phone number.")]
    InvalidRecipientPhone,

    #[error("Please enter the fee amount to be collected.")]
    MissingDoorFee,

    #[error("The fee amount to be collected must be a positive number.")]
    InvalidDoorFee,

    #[error("The delivery must not be scheduled before the pickup.")]
    DropoffBeforePickup,

    #[error("Please add at least one delivery commune.")]
    NoDestinations,

    #[error("Please add at least one package for {0}.")]
    EmptyDestination(String),

    #[error("Please provide a valid phone number.")]
    InvalidPhoneNumber,

    #[error("Veuillez accepter les Conditions d'utilisation.")]
    TermsNotAccepted,

    #[error("Veuillez accepter la Politique de confidentialité.")]
    PrivacyNotAccepted,

    #[error("Le nom ne peut pas être vide.")]
    EmptyName,

    #[error("Tous les champs doivent être remplis.")]
    IncompleteShop,
}

/// A validated shipment request, ready to be filed for a user's shop
#[derive(Debug, Clone, PartialEq)]
pub struct NewRequest {
    pub name: String,
    pub description: String,
    pub category: ParcelCategory,
    pub pickup: Location,
    pub delivery: Location,
    pub pickup_at: NaiveDateTime,
    pub dropoff_at: NaiveDateTime,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub door_fee: Option<Money>,
    /// Shown before submitting; the backend bills its own figure
    pub estimated_fee: Money,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPackage {
    pub recipient_name: String,
    pub recipient_phone: String,
    pub door_fee: Option<Money>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDestination {
    pub location: Location,
    pub packages: Vec<NewPackage>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMultipleRequest {
    pub pickup: Location,
    pub pickup_at: NaiveDateTime,
    pub destinations: Vec<NewDestination>,
    pub estimated_fee: Money,
}

#[derive(Debug, Clone, Default)]
pub struct SingleRequestForm {
    pub name: String,
    pub description: String,
    pub express: bool,
    pub pickup: Location,
    pub delivery: Location,
    pub pickup_at: NaiveDateTime,
    pub dropoff_at: NaiveDateTime,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub collect_at_door: bool,
    /// Raw text of the amount field
    pub door_fee_amount: String,
}

impl SingleRequestForm {
    pub fn validate(&self) -> Result<NewRequest, ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::MissingParcelDescription);
        }
        check_location(&self.pickup, ValidationError::MissingPickupLocation)?;
        check_location(&self.delivery, ValidationError::MissingDeliveryLocation)?;
        check_schedule(self.pickup_at, self.dropoff_at)?;
        check_recipient(&self.recipient_name, &self.recipient_phone)?;
        let door_fee = door_fee(self.collect_at_door, &self.door_fee_amount)?;

        let category = if self.express {
            ParcelCategory::Express
        } else {
            ParcelCategory::Single
        };

        Ok(NewRequest {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            category,
            estimated_fee: estimate_fee(&self.pickup.zone, &self.delivery.zone, category),
            pickup: self.pickup.clone(),
            delivery: self.delivery.clone(),
            pickup_at: self.pickup_at,
            dropoff_at: self.dropoff_at,
            recipient_name: self.recipient_name.trim().to_string(),
            recipient_phone: self.recipient_phone.trim().to_string(),
            door_fee,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct CargoRequestForm {
    pub description: String,
    pub pickup: Location,
    pub delivery: Location,
    pub pickup_at: NaiveDateTime,
    pub dropoff_at: NaiveDateTime,
    pub recipient_name: String,
    pub recipient_phone: String,
}

impl CargoRequestForm {
    pub fn validate(&self) -> Result<NewRequest, ValidationError> {
        check_location(&self.pickup, ValidationError::MissingPickupLocation)?;
        check_location(&self.delivery, ValidationError::MissingDeliveryLocation)?;
        if self.description.trim().is_empty() {
            return Err(ValidationError::MissingDescription);
        }
        check_schedule(self.pickup_at, self.dropoff_at)?;
        check_recipient(&self.recipient_name, &self.recipient_phone)?;

        Ok(NewRequest {
            name: "Cargaison".to_string(),
            description: self.description.trim().to_string(),
            category: ParcelCategory::Cargo,
            estimated_fee: estimate_fee(
                &self.pickup.zone,
                &self.delivery.zone,
                ParcelCategory::Cargo,
            ),
            pickup: self.pickup.clone(),
            delivery: self.delivery.clone(),
            pickup_at: self.pickup_at,
            dropoff_at: self.dropoff_at,
            recipient_name: self.recipient_name.trim().to_string(),
            recipient_phone: self.recipient_phone.trim().to_string(),
            door_fee: None,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct PackageForm {
    pub recipient_name: String,
    pub recipient_phone: String,
    pub collect_at_door: bool,
    pub door_fee_amount: String,
}

#[derive(Debug, Clone, Default)]
pub struct DestinationForm {
    pub location: Location,
    pub packages: Vec<PackageForm>,
}

#[derive(Debug, Clone, Default)]
pub struct MultipleRequestForm {
    pub pickup: Location,
    pub pickup_at: NaiveDateTime,
    pub destinations: Vec<DestinationForm>,
}

impl MultipleRequestForm {
    pub fn validate(&self) -> Result<NewMultipleRequest, ValidationError> {
        check_location(&self.pickup, ValidationError::MissingPickupLocation)?;
        if self.destinations.is_empty() {
            return Err(ValidationError::NoDestinations);
        }

        let mut destinations = Vec::with_capacity(self.destinations.len());
        let mut estimated_fee = Money::ZERO;
        for destination in &self.destinations {
            check_location(
                &destination.location,
                ValidationError::MissingDeliveryLocation,
            )?;
            if destination.packages.is_empty() {
                return Err(ValidationError::EmptyDestination(
                    destination.location.to_string(),
                ));
            }

            let packages = destination
                .packages
                .iter()
                .map(|pkg| {
                    Ok(NewPackage {
                        recipient_name: pkg.recipient_name.trim().to_string(),
                        recipient_phone: pkg.recipient_phone.trim().to_string(),
                        door_fee: door_fee(pkg.collect_at_door, &pkg.door_fee_amount)?,
                    })
                })
                .collect::<Result<Vec<_>, ValidationError>>()?;

            let per_package = estimate_fee(
                &self.pickup.zone,
                &destination.location.zone,
                ParcelCategory::Multiple,
            );
            for _ in &packages {
                estimated_fee += per_package;
            }

            destinations.push(NewDestination {
                location: destination.location.clone(),
                packages,
            });
        }

        Ok(NewMultipleRequest {
            pickup: self.pickup.clone(),
            pickup_at: self.pickup_at,
            destinations,
            estimated_fee,
        })
    }
}

/// Shop registration details, checked locally before the identity
/// provider is asked to send a verification code. The account itself is
/// created by the provider, not by this client.
#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub shop_name: String,
    pub phone_number: String,
    pub location: Location,
    pub shop_address: String,
    pub terms_accepted: bool,
    pub privacy_accepted: bool,
}

impl SignUpForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.shop_name.trim().is_empty() || self.shop_address.trim().is_empty() {
            return Err(ValidationError::IncompleteShop);
        }
        validate_phone(&self.phone_number)?;
        check_location(&self.location, ValidationError::IncompleteShop)?;
        if !self.terms_accepted {
            return Err(ValidationError::TermsNotAccepted);
        }
        if !self.privacy_accepted {
            return Err(ValidationError::PrivacyNotAccepted);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopUpdate {
    pub id: String,
    pub name: String,
    pub location: Location,
    pub address: String,
}

impl ShopUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let blank = [&self.id, &self.name, &self.address]
            .iter()
            .any(|field| field.trim().is_empty());
        if blank || self.location.is_blank() {
            return Err(ValidationError::IncompleteShop);
        }
        Ok(())
    }
}

pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(name.to_string())
}

/// Account phone number, trimmed
pub fn validate_phone(phone: &str) -> Result<String, ValidationError> {
    let phone = phone.trim();
    if phone.len() < MIN_PHONE_LEN {
        return Err(ValidationError::InvalidPhoneNumber);
    }
    Ok(phone.to_string())
}

fn check_location(location: &Location, missing: ValidationError) -> Result<(), ValidationError> {
    if location.is_blank() {
        return Err(missing);
    }
    if !is_known_location(&location.zone, &location.sub_zone) {
        return Err(ValidationError::UnknownLocation(location.to_string()));
    }
    Ok(())
}

fn check_schedule(pickup: NaiveDateTime, dropoff: NaiveDateTime) -> Result<(), ValidationError> {
    if dropoff < pickup {
        return Err(ValidationError::DropoffBeforePickup);
    }
    Ok(())
}

fn check_recipient(name: &str, phone: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::MissingRecipientName);
    }
    if phone.trim().len() < MIN_PHONE_LEN {
        return Err(ValidationError::InvalidRecipientPhone);
    }
    Ok(())
}

fn door_fee(collect_at_door: bool, amount: &str) -> Result<Option<Money>, ValidationError> {
    if !collect_at_door {
        return Ok(None);
    }
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(ValidationError::MissingDoorFee);
    }
    match amount.replace(' ', "").parse::<i64>() {
        Ok(value) if value > 0 => Ok(Some(Money::gnf(value))),
        _ => Err(ValidationError::InvalidDoorFee),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ts;

    fn single() -> SingleRequestForm {
        SingleRequestForm {
            name: " Sac de riz ".to_string(),
            description: "25 kg".to_string(),
            express: false,
            pickup: Location::new("Ratoma", "Kipé"),
            delivery: Location::new("Lambanyi", "Kinifi"),
            pickup_at: ts(2024, 10, 2, 9, 0, 0),
            dropoff_at: ts(2024, 10, 2, 15, 0, 0),
            recipient_name: "Alpha Diallo".to_string(),
            recipient_phone: "620112233".to_string(),
            collect_at_door: false,
            door_fee_amount: String::new(),
        }
    }

    #[test]
    fn test_valid_single_request() {
        let request = single().validate().unwrap();
        assert_eq!(request.name, "Sac de riz");
        assert_eq!(request.category, ParcelCategory::Single);
        assert_eq!(request.estimated_fee, Money::gnf(15_000));
        assert_eq!(request.door_fee, None);
    }

    #[test]
    fn test_single_request_requires_description() {
        let form = SingleRequestForm {
            description: "   ".to_string(),
            ..single()
        };
        assert_eq!(
            form.validate(),
            Err(ValidationError::MissingParcelDescription)
        );
        assert_eq!(
            ValidationError::MissingParcelDescription.to_string(),
            "Please provide a parcel description."
        );

        // The name is checked first
        let form = SingleRequestForm {
            name: String::new(),
            ..form
        };
        assert_eq!(form.validate(), Err(ValidationError::MissingName));
    }

    #[test]
    fn test_express_single_request() {
        let form = SingleRequestForm {
            express: true,
            ..single()
        };
        let request = form.validate().unwrap();
        assert_eq!(request.category, ParcelCategory::Express);
        assert_eq!(request.estimated_fee, Money::gnf(20_000));
    }

    #[test]
    fn test_single_request_errors() {
        let mut form = single();
        form.pickup = Location::default();
        assert_eq!(form.validate(), Err(ValidationError::MissingPickupLocation));

        let mut form = single();
        form.delivery = Location::new("Lambanyi", "Kipé");
        assert!(matches!(
            form.validate(),
            Err(ValidationError::UnknownLocation(_))
        ));

        let mut form = single();
        form.recipient_phone = "6201".to_string();
        assert_eq!(form.validate(), Err(ValidationError::InvalidRecipientPhone));

        let mut form = single();
        form.dropoff_at = ts(2024, 10, 1, 9, 0, 0);
        assert_eq!(form.validate(), Err(ValidationError::DropoffBeforePickup));
    }

    #[test]
    fn test_door_fee_rules() {
        let mut form = single();
        form.collect_at_door = true;
        assert_eq!(form.validate(), Err(ValidationError::MissingDoorFee));

        form.door_fee_amount = "abc".to_string();
        assert_eq!(form.validate(), Err(ValidationError::InvalidDoorFee));

        form.door_fee_amount = "150 000".to_string();
        assert_eq!(form.validate().unwrap().door_fee, Some(Money::gnf(150_000)));
    }

    #[test]
    fn test_cargo_requires_description() {
        let form = CargoRequestForm {
            description: "  ".to_string(),
            pickup: Location::new("Matoto", "Kissosso"),
            delivery: Location::new("Matoto", "Simbaya 2"),
            pickup_at: ts(2024, 10, 2, 9, 0, 0),
            dropoff_at: ts(2024, 10, 3, 9, 0, 0),
            recipient_name: "Fatou".to_string(),
            recipient_phone: "664000000".to_string(),
        };
        assert_eq!(form.validate(), Err(ValidationError::MissingDescription));

        let form = CargoRequestForm {
            description: "Matériaux".to_string(),
            ..form
        };
        let request = form.validate().unwrap();
        assert_eq!(request.name, "Cargaison");
        assert_eq!(request.category, ParcelCategory::Cargo);
        assert_eq!(request.estimated_fee, Money::gnf(10_000));
    }

    #[test]
    fn test_multiple_request() {
        let package = |fee: &str| PackageForm {
            recipient_name: "Client".to_string(),
            recipient_phone: "620000000".to_string(),
            collect_at_door: !fee.is_empty(),
            door_fee_amount: fee.to_string(),
        };
        let mut form = MultipleRequestForm {
            pickup: Location::new("Ratoma", "Taouyah"),
            pickup_at: ts(2024, 10, 2, 9, 0, 0),
            destinations: Vec::new(),
        };
        assert_eq!(form.validate(), Err(ValidationError::NoDestinations));

        form.destinations = vec![
            DestinationForm {
                location: Location::new("Sonfonia", "Kobayah"),
                packages: vec![package(""), package("5000")],
            },
            DestinationForm {
                location: Location::new("Gbessia", "Béhanzin"),
                packages: vec![package("")],
            },
        ];
        let request = form.validate().unwrap();
        assert_eq!(request.destinations.len(), 2);
        assert_eq!(
            request.destinations[0].packages[1].door_fee,
            Some(Money::gnf(5_000))
        );
        // Two adjacent packages and one distant package
        assert_eq!(request.estimated_fee, Money::gnf(15_000 * 2 + 25_000));

        form.destinations[1].packages = vec![package(" ")];
        assert_eq!(form.validate(), Err(ValidationError::MissingDoorFee));

        form.destinations[1].packages.clear();
        assert!(matches!(
            form.validate(),
            Err(ValidationError::EmptyDestination(_))
        ));
    }

    #[test]
    fn test_sign_up_requires_both_acceptances() {
        let mut form = SignUpForm {
            shop_name: "Boutique Kipé".to_string(),
            phone_number: "+224620000001".to_string(),
            location: Location::new("Ratoma", "Kipé"),
            shop_address: "Route du Prince".to_string(),
            terms_accepted: true,
            privacy_accepted: false,
        };
        assert_eq!(form.validate(), Err(ValidationError::PrivacyNotAccepted));
        form.privacy_accepted = true;
        form.terms_accepted = false;
        assert_eq!(form.validate(), Err(ValidationError::TermsNotAccepted));
        form.terms_accepted = true;
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_profile_and_shop_updates() {
        assert_eq!(validate_name("  "), Err(ValidationError::EmptyName));
        assert_eq!(validate_name(" Aïssatou ").unwrap(), "Aïssatou");

        assert_eq!(validate_phone(" 6201 "), Err(ValidationError::InvalidPhoneNumber));
        assert_eq!(validate_phone(" +224620000002 ").unwrap(), "+224620000002");

        let shop = ShopUpdate {
            id: "s1".to_string(),
            name: "Boutique".to_string(),
            location: Location::new("Ratoma", ""),
            address: "Kipé".to_string(),
        };
        assert_eq!(shop.validate(), Err(ValidationError::IncompleteShop));
    }
}
