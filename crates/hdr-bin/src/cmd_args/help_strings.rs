/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

pub static CREATE_HELP: &str = "Create an HDR image with a plain gamma tonemap

Images are aligned, merged into a radiance map using the camera
response recovered from the images themselves, normalised and
gamma corrected.

Example:
    hdr create dark.jpg normal.jpg bright.jpg";

pub static DRAGO_HELP: &str = "Create an HDR image with the Drago tonemap

Adaptive logarithmic mapping, the base of the logarithm varies
between 2 and 10 depending on the brightness of each pixel.
Lower bias values give brighter results";

pub static DURAND_HELP: &str = "Create an HDR image with the Durand tonemap

Luminance is split into a base layer, found with a bilateral filter,
and a detail layer. Only the base layer is compressed so fine detail
survives";

pub static MANTIUK_HELP: &str = "Create an HDR image with the Mantiuk tonemap

Works on contrast at multiple scales, contrast is scaled down and the
image is rebuilt by solving for the luminance that best matches it";

pub static MERTENS_HELP: &str = "Create an image by exposure fusion

The exposures are blended directly using per pixel weights for
contrast, saturation and well-exposedness. No radiance map is built,
so exposure times are never read";

pub static REINHARD_HELP: &str = "Create an HDR image with the Reinhard tonemap

Global operator modelled on photoreceptor adaptation, adaptation can
be varied between global and per pixel as well as between shared and
per channel";

pub static PROBE_HELP: &str = "Print dimensions and exposure time of images as json

Use this to check which exposure times would be read when
--exposures is not given";

pub static EXPOSURES_HELP: &str = "Comma separated exposure times in seconds, one per image

When absent, exposure times are read from the ExposureTime tag
of each image";

pub static ALGORITHM_HELP: &str = "Camera response calibration and merge algorithm

One of debevec or robertson";

pub static LICENSE_TEXT: &str = "hdr, licensed under MIT, Apache-2.0 or Zlib at your option.

This program comes with ABSOLUTELY NO WARRANTY.
This is free software, and you are welcome to redistribute it
under the terms of any of the above licenses.";
