//! Static booking links shown under some answers

use serde::Serialize;

use super::SectionId;

/// A fixed (label, URL) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuxLink {
    pub label: &'static str,
    pub url: &'static str,
}

pub type AuxiliaryLinks = &'static [AuxLink];

const TRANSPORT_LINKS: [AuxLink; 4] = [
    AuxLink {
        label: "Book Flights",
        url: "https://www.skyscanner.com",
    },
    AuxLink {
        label: "Train Tickets",
        url: "https://www.irctc.co.in",
    },
    AuxLink {
        label: "Bus Booking",
        url: "https://www.redbus.in",
    },
    AuxLink {
        label: "Car Rentals",
        url: "https://www.uber.com",
    },
];

const ACCOMMODATION_LINKS: [AuxLink; 2] = [
    AuxLink {
        label: "Find Hotels",
        url: "https://www.booking.com",
    },
    AuxLink {
        label: "Best Restaurants",
        url: "https://www.zomato.com",
    },
];

impl SectionId {
    /// Links attached to this section's answer, empty for most sections
    #[must_use]
    pub fn links(self) -> AuxiliaryLinks {
        match self {
            SectionId::TransportGuide => &TRANSPORT_LINKS,
            SectionId::AccommodationPlanner => &ACCOMMODATION_LINKS,
            SectionId::LocationFinder | SectionId::TripPlanner | SectionId::BudgetPlanner => &[],
        }
    }

    /// Title printed above the link list
    #[must_use]
    pub fn links_title(self) -> Option<&'static str> {
        match self {
            SectionId::TransportGuide => Some("Direct Booking Links"),
            SectionId::AccommodationPlanner => Some("Useful Booking Links"),
            _ => None,
        }
    }
}
