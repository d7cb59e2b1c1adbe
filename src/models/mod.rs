mod engagement;
mod profile;
mod section;

pub use engagement::{Lead, NewLead, NewTestimonial, Testimonial};
pub use profile::{CreateProfileRequest, NewProfile, Profile, ProfilePatch, UpdateProfileRequest};
pub use section::{NewSection, ProfileSection, SectionKind};
